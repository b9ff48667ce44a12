use log::debug;

use super::{TAG_AGENT, TAG_BLOCKED, TAG_DIRECT};
use crate::models::{FullConfig, RoutingRule};
use crate::settings::{ERoutingMode, GeneratorSettings};
use crate::utils::matcher::is_ip_rule;
use crate::utils::string::split_csv;

const GOOGLEAPIS_CN: &str = "domain:googleapis.cn";
const ALL_PORTS: &str = "0-65535";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoTarget {
    Ip,
    Domain,
    Both,
}

/// Split comma-separated user rules into (domains, ips).
pub fn split_user_rules(rules: &str) -> (Vec<String>, Vec<String>) {
    split_csv(rules).into_iter().partition(|rule| !is_ip_rule(rule))
}

/// Append one domain rule and one IP rule for `tag`, skipping empty ones.
pub fn routing_user_rule(rules: &str, tag: &str, config: &mut FullConfig) {
    let (domains, ips) = split_user_rules(rules);
    if !domains.is_empty() {
        let mut rule = RoutingRule::to_outbound(tag);
        rule.domain = Some(domains);
        config.routing.rules.push(rule);
    }
    if !ips.is_empty() {
        let mut rule = RoutingRule::to_outbound(tag);
        rule.ip = Some(ips);
        config.routing.rules.push(rule);
    }
}

/// Append `geoip:<code>` and/or `geosite:<code>` rules for `tag`.
pub fn routing_geo(target: GeoTarget, code: &str, tag: &str, config: &mut FullConfig) {
    if code.is_empty() {
        return;
    }
    if matches!(target, GeoTarget::Ip | GeoTarget::Both) {
        let mut rule = RoutingRule::to_outbound(tag);
        rule.ip = Some(vec![format!("geoip:{}", code)]);
        config.routing.rules.push(rule);
    }
    if matches!(target, GeoTarget::Domain | GeoTarget::Both) {
        let mut rule = RoutingRule::to_outbound(tag);
        rule.domain = Some(vec![format!("geosite:{}", code)]);
        config.routing.rules.push(rule);
    }
}

pub fn apply_routing(config: &mut FullConfig, settings: &GeneratorSettings) {
    routing_user_rule(&settings.user_routing_agent, TAG_AGENT, config);
    routing_user_rule(&settings.user_routing_direct, TAG_DIRECT, config);
    routing_user_rule(&settings.user_routing_blocked, TAG_BLOCKED, config);

    config.routing.domain_strategy = settings.routing_domain_strategy.clone();

    let mode = settings.routing_mode;
    if mode.bypasses_lan() {
        routing_geo(GeoTarget::Ip, "private", TAG_DIRECT, config);
    }
    if mode.bypasses_mainland() {
        routing_geo(GeoTarget::Both, "cn", TAG_DIRECT, config);
        let mut googleapis = RoutingRule::to_outbound(TAG_AGENT);
        googleapis.domain = Some(vec![GOOGLEAPIS_CN.to_string()]);
        config.routing.rules.insert(0, googleapis);
    }
    if mode == ERoutingMode::GlobalDirect {
        let mut catch_all = RoutingRule::to_outbound(TAG_DIRECT);
        catch_all.port = Some(ALL_PORTS.to_string());
        config.routing.rules.push(catch_all);
    }

    debug!(
        "Routing mode {} produced {} rules",
        mode,
        config.routing.rules.len()
    );
}
