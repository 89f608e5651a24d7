// ── Device domain types ──
//
// The Maker API payload only carries `{type, id, label}`; what a device
// can do is fixed by its driver type. Rather than a subclass per driver,
// the kind is a flat enum and the op table is precomputed at
// construction, so command validation is a map lookup and kind matching
// is exhaustiveness-checked.

use std::collections::BTreeMap;

use hubmate_api::maker::DeviceRecord;

/// Canonical device kind, normalized from the Maker API driver name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum DeviceKind {
    Switch,
    Dimmer,
    Shade,
    ContactSensor,
    Button,
    Hub,
    Other,
}

impl DeviceKind {
    /// Map a Maker API driver `type` string to a kind.
    ///
    /// Unknown drivers become [`DeviceKind::Other`]: they still resolve
    /// by name, they just support no commands.
    pub fn from_driver(driver: &str) -> Self {
        match driver {
            "Hub Information Driver v3" => Self::Hub,
            "Virtual Switch"
            | "Room Lights Activator Switch"
            | "Generic Zigbee Outlet"
            | "Zooz Zen76 S2 Switch" => Self::Switch,
            "Room Lights Activator Dimmer"
            | "Room Lights Activator Bulb"
            | "Zooz Zen27 Central Scene Dimmer" => Self::Dimmer,
            "Room Lights Activator Shade" => Self::Shade,
            "Generic Zigbee Contact Sensor" | "Ring Alarm Contact Sensor" => Self::ContactSensor,
            "Sonoff Zigbee Button Controller" | "Zooz ZEN34 Remote Switch" => Self::Button,
            _ => Self::Other,
        }
    }

    /// The command → required-argument-count table for this kind.
    fn supported_ops(self) -> BTreeMap<String, usize> {
        let ops: &[(&str, usize)] = match self {
            Self::Switch => &[("on", 0), ("off", 0)],
            Self::Dimmer => &[("on", 0), ("off", 0), ("setLevel", 1)],
            Self::Shade => &[("open", 0), ("close", 0)],
            Self::Button => &[("push", 1)],
            Self::Hub => &[("reboot", 0), ("deepReboot", 0)],
            Self::ContactSensor | Self::Other => &[],
        };
        ops.iter().map(|&(name, n)| (name.to_string(), n)).collect()
    }

    /// The attribute → allowed-values table for this kind.
    fn attributes(self) -> BTreeMap<String, Vec<String>> {
        let attrs: &[(&str, &[&str])] = match self {
            Self::ContactSensor => &[("contact", &["open", "closed"])],
            Self::Hub => &[("firmwareVersionString", &["string"])],
            _ => &[],
        };
        attrs
            .iter()
            .map(|&(name, values)| {
                (
                    name.to_string(),
                    values.iter().map(|v| (*v).to_string()).collect(),
                )
            })
            .collect()
    }

    /// The listing group this kind belongs to.
    pub fn group(self) -> KindGroup {
        match self {
            Self::Switch | Self::Dimmer => KindGroup::Actuators,
            Self::Shade => KindGroup::Shades,
            Self::ContactSensor => KindGroup::Sensors,
            Self::Button => KindGroup::Buttons,
            Self::Hub => KindGroup::Hubs,
            Self::Other => KindGroup::Other,
        }
    }
}

/// Display grouping for `/list` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KindGroup {
    Actuators,
    Buttons,
    Hubs,
    Sensors,
    Shades,
    Other,
}

impl KindGroup {
    pub fn title(self) -> &'static str {
        match self {
            Self::Actuators => "Actuators",
            Self::Buttons => "Buttons",
            Self::Hubs => "Hubs",
            Self::Sensors => "Sensors",
            Self::Shades => "Shades",
            Self::Other => "Other",
        }
    }
}

/// A device behind the hub, immutable after construction.
#[derive(Debug, Clone)]
pub struct Device {
    pub id: i64,
    pub label: String,
    pub kind: DeviceKind,
    /// Command name → required argument count, fixed by the kind.
    pub supported_ops: BTreeMap<String, usize>,
    /// Attribute name → allowed value set, fixed by the kind.
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl Device {
    pub fn new(id: i64, label: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            supported_ops: kind.supported_ops(),
            attributes: kind.attributes(),
        }
    }

    /// Build a device from a Maker API list record.
    pub fn from_record(record: &DeviceRecord) -> Self {
        Self::new(record.id, record.label.clone(), DeviceKind::from_driver(&record.driver))
    }

    pub fn supports(&self, command: &str) -> bool {
        self.supported_ops.contains_key(command)
    }
}
