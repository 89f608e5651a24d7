// ── Device index ──
//
// Lowercase alias → device lookup. Every device is reachable by its
// full label, by the label with a trailing "light"/"lights" word
// stripped (when that changes the string), and by one computed
// abbreviation. Key collisions are last-write-wins and produce a
// warning; the full-name pass runs before the abbreviation pass, so a
// full name always survives an abbreviation that happens to equal it.
//
// A rebuilt index replaces the previous one wholesale: `DeviceRegistry`
// publishes it behind an `ArcSwap`, so readers always see a complete
// snapshot and a refresh never exposes a half-built map.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::warn;

use crate::abbrev::AbbreviationEngine;
use crate::error::CoreError;
use crate::model::{Device, DeviceKind, KindGroup};

/// One immutable snapshot of the alias → device mapping.
#[derive(Default)]
pub struct DeviceIndex {
    aliases: HashMap<String, Arc<Device>>,
    /// Devices in list order, one entry each (alias map is many-to-one).
    devices: Vec<Arc<Device>>,
    /// Union of every device's command names, for front-end routing.
    commands: HashSet<String>,
}

impl DeviceIndex {
    /// Build an index from a device-list snapshot.
    ///
    /// Returns the index and the warnings accumulated while building it
    /// (duplicate aliases, names the abbreviation engine could not
    /// disambiguate). Warnings are surfaced, never fatal.
    pub fn build(devices: Vec<Device>) -> (Self, Vec<String>) {
        let mut index = Self::default();
        let mut warnings = Vec::new();

        let devices: Vec<Arc<Device>> = devices.into_iter().map(Arc::new).collect();

        // Full names first, then suffix-stripped variants.
        for device in &devices {
            let full_name = device.label.to_lowercase();
            index.insert(full_name.clone(), Arc::clone(device), &mut warnings);

            let stripped = strip_light_suffix(&full_name);
            if stripped != full_name {
                index.insert(stripped, Arc::clone(device), &mut warnings);
            }
        }

        // Abbreviations last, computed over the complete name set.
        let mut engine = AbbreviationEngine::new();
        for device in &devices {
            if let Err(e) = engine.register(&device.label.to_lowercase()) {
                warnings.push(format!("WARNING {e}"));
            }
        }
        warnings.extend(engine.finalize());

        for device in &devices {
            match engine.abbreviation_of(&device.label.to_lowercase()) {
                Ok(abbr) => {
                    let abbr = abbr.to_string();
                    index.insert(abbr, Arc::clone(device), &mut warnings);
                }
                Err(e) => {
                    let message = format!("WARNING Device name was not abbreviated: {e}");
                    warn!("{message}");
                    warnings.push(message);
                }
            }
        }

        for device in &devices {
            index.commands.extend(device.supported_ops.keys().cloned());
        }
        index.devices = devices;

        (index, warnings)
    }

    fn insert(&mut self, key: String, device: Arc<Device>, warnings: &mut Vec<String>) {
        if self.aliases.contains_key(&key) {
            let message = format!("WARNING Duplicate key found in cache: {key}");
            warn!("{message}");
            warnings.push(message);
        }
        self.aliases.insert(key, device);
    }

    /// Look up an alias, case-insensitively.
    pub fn find(&self, alias: &str) -> Result<Arc<Device>, CoreError> {
        self.aliases
            .get(&alias.to_lowercase())
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                query: alias.to_string(),
            })
    }

    /// Resolve an alias to a device that supports `command`.
    pub fn resolve(&self, alias: &str, command: &str) -> Result<Arc<Device>, CoreError> {
        let device = self.find(alias)?;
        if !device.supports(command) {
            return Err(CoreError::UnsupportedCommand {
                label: device.label.clone(),
                command: command.to_string(),
            });
        }
        Ok(device)
    }

    /// All devices of one kind, deduplicated by identity — many aliases
    /// point to the same device, but it is listed once.
    pub fn find_by_kind(&self, kind: DeviceKind) -> Vec<Arc<Device>> {
        let mut seen = HashSet::new();
        self.devices
            .iter()
            .filter(|d| d.kind == kind && seen.insert(d.id))
            .cloned()
            .collect()
    }

    /// `true` when any indexed device supports `command` — used by the
    /// front end to decide whether a bare `/command device` message is a
    /// device command at all.
    pub fn is_device_command(&self, command: &str) -> bool {
        self.commands.contains(command)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Devices grouped for listing: `(group, [(label, aliases)])`,
    /// groups and devices in stable order, each device's aliases longest
    /// first (full name down to abbreviation).
    pub fn by_group(&self) -> Vec<(KindGroup, Vec<(String, Vec<String>)>)> {
        let mut alias_map: HashMap<i64, Vec<String>> = HashMap::new();
        for (alias, device) in &self.aliases {
            alias_map.entry(device.id).or_default().push(alias.clone());
        }

        let mut groups: Vec<(KindGroup, Vec<(String, Vec<String>)>)> = Vec::new();
        for device in &self.devices {
            let group = device.kind.group();
            let mut aliases = alias_map.remove(&device.id).unwrap_or_default();
            aliases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

            match groups.iter_mut().find(|(g, _)| *g == group) {
                Some((_, rows)) => rows.push((device.label.clone(), aliases)),
                None => groups.push((group, vec![(device.label.clone(), aliases)])),
            }
        }
        groups.sort_by_key(|(g, _)| *g);
        groups
    }
}

/// Remove a trailing " light"/" lights" word, mirroring how people
/// shorten "kitchen light" to just "kitchen".
fn strip_light_suffix(name: &str) -> String {
    name.strip_suffix(" lights")
        .or_else(|| name.strip_suffix(" light"))
        .unwrap_or(name)
        .trim()
        .to_string()
}

/// Process-wide holder of the current [`DeviceIndex`] snapshot.
///
/// A refresh builds the new index offline and swaps it in atomically;
/// in-flight readers keep the snapshot they loaded.
#[derive(Default)]
pub struct DeviceRegistry {
    snapshot: ArcSwap<DeviceIndex>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current index snapshot (cheap to load, safe to hold).
    pub fn load(&self) -> Arc<DeviceIndex> {
        self.snapshot.load_full()
    }

    /// Rebuild from a fresh device list and publish the result.
    ///
    /// Returns `(device_count, warnings)`.
    pub fn refresh(&self, devices: Vec<Device>) -> (usize, Vec<String>) {
        let (index, warnings) = DeviceIndex::build(devices);
        let count = index.device_count();
        self.snapshot.store(Arc::new(index));
        (count, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_devices() -> Vec<Device> {
        vec![
            Device::new(1, "Kitchen Light", DeviceKind::Switch),
            Device::new(2, "Bedroom Light", DeviceKind::Dimmer),
            Device::new(3, "Living Room Light", DeviceKind::Switch),
            Device::new(4, "Den Hub", DeviceKind::Hub),
            Device::new(5, "Front Door", DeviceKind::ContactSensor),
        ]
    }

    #[test]
    fn every_label_resolves_case_insensitively() {
        let (index, warnings) = DeviceIndex::build(sample_devices());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

        for (alias, id) in [
            ("Kitchen Light", 1),
            ("kitchen light", 1),
            ("KITCHEN LIGHT", 1),
            ("bedroom light", 2),
        ] {
            let device = index.resolve(alias, "on").expect("resolve");
            assert_eq!(device.id, id);
        }
    }

    #[test]
    fn suffix_stripped_and_abbreviated_aliases_resolve() {
        let (index, _) = DeviceIndex::build(sample_devices());

        assert_eq!(index.resolve("kitchen", "on").expect("stripped").id, 1);
        assert_eq!(index.resolve("living room", "on").expect("stripped").id, 3);
        assert_eq!(index.resolve("kl", "on").expect("abbreviation").id, 1);
        assert_eq!(index.resolve("bl", "on").expect("abbreviation").id, 2);
        assert_eq!(index.resolve("lrl", "on").expect("abbreviation").id, 3);
    }

    #[test]
    fn unknown_alias_is_not_found() {
        let (index, _) = DeviceIndex::build(sample_devices());
        match index.resolve("garage light", "on") {
            Err(CoreError::NotFound { query }) => assert_eq!(query, "garage light"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_command_names_device_and_command() {
        let (index, _) = DeviceIndex::build(sample_devices());
        match index.resolve("kitchen light", "setLevel") {
            Err(CoreError::UnsupportedCommand { label, command }) => {
                assert_eq!(label, "Kitchen Light");
                assert_eq!(command, "setLevel");
            }
            other => panic!("expected UnsupportedCommand, got {other:?}"),
        }
    }

    #[test]
    fn find_by_kind_deduplicates_devices_with_many_aliases() {
        let (index, _) = DeviceIndex::build(sample_devices());

        // "Kitchen Light" is indexed under three aliases but listed once.
        let switches = index.find_by_kind(DeviceKind::Switch);
        assert_eq!(switches.len(), 2);

        let hubs = index.find_by_kind(DeviceKind::Hub);
        assert_eq!(hubs.len(), 1);
        assert_eq!(hubs[0].label, "Den Hub");
    }

    #[test]
    fn duplicate_keys_warn_and_last_write_wins() {
        let devices = vec![
            Device::new(1, "Porch Light", DeviceKind::Switch),
            Device::new(2, "Porch", DeviceKind::Switch),
        ];
        let (index, warnings) = DeviceIndex::build(devices);

        // "porch light" strips to "porch", colliding with device 2's
        // full name; device 2 registered later and wins.
        assert!(warnings.iter().any(|w| w.contains("porch")), "{warnings:?}");
        assert_eq!(index.resolve("porch", "on").expect("resolve").id, 2);
        assert_eq!(index.resolve("porch light", "on").expect("resolve").id, 1);
    }

    #[test]
    fn command_union_routes_device_commands() {
        let (index, _) = DeviceIndex::build(sample_devices());
        assert!(index.is_device_command("on"));
        assert!(index.is_device_command("setLevel"));
        assert!(index.is_device_command("deepReboot"));
        assert!(!index.is_device_command("cancelAlerts"));
    }

    #[test]
    fn registry_swaps_snapshots_wholesale() {
        let registry = DeviceRegistry::new();
        let (count, _) = registry.refresh(sample_devices());
        assert_eq!(count, 5);

        let before = registry.load();
        let (count, _) = registry.refresh(vec![Device::new(9, "Attic Fan", DeviceKind::Switch)]);
        assert_eq!(count, 1);

        // The old snapshot is still intact for readers that hold it.
        assert!(before.resolve("kitchen light", "on").is_ok());
        assert!(registry.load().resolve("kitchen light", "on").is_err());
        assert!(registry.load().resolve("attic fan", "on").is_ok());
    }

    #[test]
    fn grouped_listing_orders_aliases_longest_first() {
        let (index, _) = DeviceIndex::build(sample_devices());
        let groups = index.by_group();

        let (_, actuators) = groups
            .iter()
            .find(|(g, _)| *g == KindGroup::Actuators)
            .expect("actuators group");
        let (label, aliases) = &actuators[0];
        assert_eq!(label, "Kitchen Light");
        assert_eq!(aliases, &vec!["kitchen light".to_string(), "kitchen".into(), "kl".into()]);
    }
}
