//! Topology compilation: self exclusion, endpoint tiers, sip aliasing and
//! notification indices.

use pretty_assertions::assert_eq;
use tests::fixtures::{self, local_zonegroup, system_key, zone};
use tests::{RemoteCtlTestHarness, RestConfig, Zone, ZoneGroup, ZoneId};

fn ids<'a>(iter: impl Iterator<Item = &'a ZoneId>) -> Vec<String> {
    let mut ids: Vec<String> = iter.map(|id| id.to_string()).collect();
    ids.sort();
    ids
}

#[test]
fn own_zone_is_never_compiled() {
    let zonegroup = local_zonegroup().with_zone(zone("z1", "us-west", &["http://west"]));
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    assert!(t.ctl.zone_conns(&ZoneId::from("z0")).is_none());
    assert_eq!(ids(t.ctl.zone_ids()), vec!["z1"]);
    assert!(!t.tracker.created_remotes().contains(&"z0".to_string()));
}

#[test]
fn own_zone_listed_as_foreign_is_skipped_too() {
    let zonegroup = ZoneGroup::new("zg-eu", "eu")
        .with_system_key(system_key())
        .with_zone(zone("z1", "eu-1", &["http://eu1"]))
        .with_foreign_zone(zone("z0", "us-local", &["http://local"]));
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    assert_eq!(ids(t.ctl.zone_ids()), vec!["z1"]);
}

#[test]
fn zone_without_any_endpoints_is_skipped() {
    let zonegroup = local_zonegroup()
        .with_zone(Zone::new("z1", "bare"))
        .with_zone(
            Zone::new("z2", "empty-override")
                .with_data_access(RestConfig::new().with_endpoints(Vec::<String>::new())),
        )
        .with_zone(zone("z3", "ok", &["http://ok"]));
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    assert!(t.ctl.zone_conns(&ZoneId::from("z1")).is_none());
    assert!(t.ctl.zone_conns(&ZoneId::from("z2")).is_none());
    assert!(t.ctl.zone_conns(&ZoneId::from("z3")).is_some());

    // Only z3 got a connection object
    assert_eq!(t.tracker.created_remotes(), vec!["z3"]);
    assert_eq!(t.ctl.state().connection_count(), 1);
    assert!(t
        .compile_logs
        .has("WARN", "no data endpoints defined"));
}

#[test]
fn override_endpoints_are_used_when_zone_has_none() {
    let zonegroup = local_zonegroup().with_zone(
        Zone::new("z1", "override-only").with_data_access(
            RestConfig::new()
                .with_endpoints(["http://override:8000"])
                .with_access_key("AK1")
                .with_secret("SK1"),
        ),
    );
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    let conns = t.ctl.zone_conns(&ZoneId::from("z1")).unwrap();
    assert_eq!(conns.data.endpoints(), ["http://override:8000".to_string()]);
    assert_eq!(conns.data.access_key().id, "AK1");
}

#[test]
fn data_access_endpoints_override_zone_endpoints() {
    let zonegroup = local_zonegroup().with_zone(
        zone("z1", "us-west", &["http://west"]).with_data_access(
            RestConfig::new()
                .with_endpoints(["http://west-data"])
                .with_access_key("AK1")
                .with_secret("SK1"),
        ),
    );
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    let conns = t.ctl.zone_conns(&ZoneId::from("z1")).unwrap();
    assert_eq!(conns.data.endpoints(), ["http://west-data".to_string()]);
}

#[test]
fn zone_without_overrides_uses_system_key() {
    let zonegroup = local_zonegroup().with_zone(zone("z1", "us-west", &["http://west"]));
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    let conns = t.ctl.zone_conns(&ZoneId::from("z1")).unwrap();
    assert_eq!(conns.data.access_key(), &system_key());
    assert_eq!(conns.data.spec().zonegroup_id, "zg-us");
    assert_eq!(conns.data.remote_id(), "z1");
    assert_eq!(t.users.total_lookups(), 0);
}

#[test]
fn sip_aliases_data_without_secondary_config() {
    let zonegroup = local_zonegroup().with_zone(zone("z1", "us-west", &["http://west"]));
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    let conns = t.ctl.zone_conns(&ZoneId::from("z1")).unwrap();
    assert!(conns.sip_is_data());
    assert!(std::ptr::eq(
        conns.data as *const _ as *const (),
        conns.sip as *const _ as *const ()
    ));
    assert_eq!(t.tracker.created(), 1);
}

#[test]
fn sip_config_builds_a_distinct_connection() {
    let zonegroup = local_zonegroup().with_zone(
        zone("z1", "us-west", &["http://west"]).with_sip(
            RestConfig::new()
                .with_endpoints(["http://west-sip"])
                .with_access_key("SIP-AK")
                .with_secret("SIP-SK"),
        ),
    );
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    let conns = t.ctl.zone_conns(&ZoneId::from("z1")).unwrap();
    assert!(!conns.sip_is_data());
    assert_eq!(conns.data.endpoints(), ["http://west".to_string()]);
    assert_eq!(conns.sip.endpoints(), ["http://west-sip".to_string()]);
    assert_eq!(conns.sip.access_key().id, "SIP-AK");
    assert_eq!(t.tracker.created(), 2);
}

#[test]
fn sip_without_endpoints_inherits_default_endpoints() {
    let zonegroup = local_zonegroup().with_zone(
        zone("z1", "us-west", &["http://west"]).with_sip(RestConfig::new().with_access_key("AK")
            .with_secret("SK")),
    );
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    let conns = t.ctl.zone_conns(&ZoneId::from("z1")).unwrap();
    assert_eq!(conns.sip.endpoints(), ["http://west".to_string()]);
}

#[test]
fn api_name_comes_from_the_zones_own_group() {
    let eu = ZoneGroup::new("zg-eu", "eu").with_zone(zone("z9", "eu-central", &["http://eu"]));
    let zonegroup = local_zonegroup()
        .with_zone(zone("z1", "us-west", &["http://west"]))
        .with_foreign_zone(zone("z9", "eu-central", &["http://eu"]))
        .with_foreign_zone(zone("z8", "ap-orphan", &["http://ap"]));
    let zone_svc = tests::MockZoneService::new("z0", zonegroup).with_zonegroup(eu);
    let t = RemoteCtlTestHarness::new(zone_svc, tests::MockUserRepository::new());

    let local = t.ctl.zone_conns(&ZoneId::from("z1")).unwrap();
    assert_eq!(local.data.api_name(), Some("us"));

    let foreign = t.ctl.zone_conns(&ZoneId::from("z9")).unwrap();
    assert_eq!(foreign.data.api_name(), Some("eu"));
    // Foreign connections are still tagged with the local zone group
    assert_eq!(foreign.data.spec().zonegroup_id, "zg-us");

    let orphan = t.ctl.zone_conns(&ZoneId::from("z8")).unwrap();
    assert_eq!(orphan.data.api_name(), None);
}

#[test]
fn local_zones_are_notify_targets_and_foreign_zones_are_not() {
    let zonegroup = local_zonegroup()
        .with_zone(zone("z1", "us-west", &["http://west"]))
        .with_zone(zone("z2", "us-central", &["http://central"]))
        .with_foreign_zone(zone("z9", "eu-central", &["http://eu"]))
        .with_data_notify("z2");
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    let meta: Vec<String> = t
        .ctl
        .meta_notify_targets()
        .map(|(id, _)| id.to_string())
        .collect();
    let data: Vec<String> = t
        .ctl
        .data_notify_targets()
        .map(|(id, _)| id.to_string())
        .collect();

    assert_eq!(meta, vec!["z1", "z2"]);
    assert_eq!(data, vec!["z2"]);

    // Notify targets point at the zone's data connection
    let z2 = t.ctl.zone_conns(&ZoneId::from("z2")).unwrap();
    assert_eq!(
        t.ctl.state().data_notify_targets().get(&ZoneId::from("z2")),
        Some(&z2.ids().data)
    );
}

#[test]
fn data_notify_targets_are_a_subset_of_meta_targets() {
    // z3 is in the notify set but has no endpoints, z9 is foreign
    let zonegroup = local_zonegroup()
        .with_zone(zone("z1", "us-west", &["http://west"]))
        .with_zone(Zone::new("z3", "broken"))
        .with_foreign_zone(zone("z9", "eu-central", &["http://eu"]))
        .with_data_notify("z1")
        .with_data_notify("z3")
        .with_data_notify("z9")
        .with_data_notify("z0");
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    let state = t.ctl.state();
    for zone_id in state.data_notify_targets().keys() {
        assert!(state.meta_notify_targets().contains_key(zone_id));
    }
    assert_eq!(ids(state.data_notify_targets().keys()), vec!["z1"]);
}

#[test]
fn zone_listed_twice_keeps_first_definition() {
    let zonegroup = local_zonegroup()
        .with_zone(zone("z1", "us-west", &["http://west"]))
        .with_foreign_zone(zone("z1", "us-west-foreign", &["http://elsewhere"]));
    let t = RemoteCtlTestHarness::for_zonegroup("z0", zonegroup);

    let conns = t.ctl.zone_conns(&ZoneId::from("z1")).unwrap();
    assert_eq!(conns.data.endpoints(), ["http://west".to_string()]);
    assert_eq!(t.tracker.created(), 1);
    assert!(t.ctl.state().meta_notify_targets().contains_key(&ZoneId::from("z1")));
}

#[test]
fn end_to_end_local_and_foreign_zone() {
    let zonegroup = ZoneGroup::new("zg-us", "us")
        .with_system_key(fixtures::system_key())
        .with_zone(zone("Z1", "zone-one", &["http://a"]))
        .with_foreign_zone(zone("Z2", "zone-two", &["http://b"]));
    let t = RemoteCtlTestHarness::for_zonegroup("self", zonegroup);

    let z1 = t.ctl.zone_conns(&ZoneId::from("Z1")).unwrap();
    assert!(z1.sip_is_data());
    assert_eq!(z1.data.access_key(), &system_key());
    assert_eq!(z1.data.endpoints(), ["http://a".to_string()]);

    let z2 = t.ctl.zone_conns(&ZoneId::from("Z2")).unwrap();
    assert_eq!(z2.data.endpoints(), ["http://b".to_string()]);
    assert!(!t
        .ctl
        .state()
        .meta_notify_targets()
        .contains_key(&ZoneId::from("Z2")));

    assert!(t.ctl.zone_conns(&ZoneId::from("unknown")).is_none());
    assert_eq!(t.ctl.len(), 2);
}
