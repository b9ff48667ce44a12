use log::debug;

use crate::models::FullConfig;
use crate::settings::GeneratorSettings;

pub const LOOPBACK: &str = "127.0.0.1";
pub const WILDCARD: &str = "0.0.0.0";
const FAKEDNS_DEST: &str = "fakedns";

/// Listen address, ports and sniffing of the socks (first) and http
/// (second) inbounds.
pub fn apply_inbounds(config: &mut FullConfig, settings: &GeneratorSettings) {
    let listen = if settings.proxy_sharing {
        WILDCARD
    } else {
        LOOPBACK
    };
    for inbound in config.inbounds.iter_mut() {
        inbound.listen = listen.to_string();
    }
    debug!("Inbounds listen on {}", listen);

    if let Some(socks) = config.inbounds.get_mut(0) {
        socks.port = settings.socks_port;
        if let Some(sniffing) = socks.sniffing.as_mut() {
            sniffing.enabled = settings.fake_dns_enabled || settings.sniffing_enabled;
            if !settings.sniffing_enabled {
                sniffing.dest_override.clear();
            }
            if settings.fake_dns_enabled && !sniffing.dest_override.iter().any(|d| d == FAKEDNS_DEST)
            {
                sniffing.dest_override.push(FAKEDNS_DEST.to_string());
            }
        }
    }

    if let Some(http) = config.inbounds.get_mut(1) {
        http.port = settings.http_port;
    }
}
