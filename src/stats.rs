use crate::error::Result;
use crate::fritz_xml::{self as xml, RawManyStats};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Unit {
    Celsius,
    Watt,
    WattHour,
    Volt,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Celsius => write!(f, "°C"),
            Unit::Watt => write!(f, "W"),
            Unit::WattHour => write!(f, "Wh"),
            Unit::Volt => write!(f, "V"),
        }
    }
}

/// Category of measurements that the fritz devices may provide.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum DeviceStatsKind {
    Temperature,
    Voltage,
    Power,
    Energy,
}

/// Per kind: display name, unit, factor from the raw value to the unit, and
/// the spellings accepted by `FromStr` besides the name.
struct KindRow {
    kind: DeviceStatsKind,
    name: &'static str,
    unit: Unit,
    multiplier: f64,
    aliases: &'static [&'static str],
}

static KINDS: [KindRow; 4] = [
    KindRow {
        kind: DeviceStatsKind::Temperature,
        name: "temperature",
        unit: Unit::Celsius,
        multiplier: 0.1,
        aliases: &["temp", "celsius", "c"],
    },
    KindRow {
        kind: DeviceStatsKind::Voltage,
        name: "voltage",
        unit: Unit::Volt,
        multiplier: 0.001,
        aliases: &["volt", "v"],
    },
    KindRow {
        kind: DeviceStatsKind::Power,
        name: "power",
        unit: Unit::Watt,
        multiplier: 0.001,
        aliases: &["watt", "w"],
    },
    KindRow {
        kind: DeviceStatsKind::Energy,
        name: "energy",
        unit: Unit::WattHour,
        multiplier: 1.0,
        aliases: &["wh"],
    },
];

impl DeviceStatsKind {
    /// All kinds in table order.
    pub fn all() -> impl Iterator<Item = DeviceStatsKind> {
        KINDS.iter().map(|row| row.kind)
    }

    fn row(&self) -> &'static KindRow {
        // every variant has exactly one row
        &KINDS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.row().name
    }

    pub fn unit(&self) -> Unit {
        self.row().unit
    }

    fn multiplier(&self) -> f64 {
        self.row().multiplier
    }
}

impl std::fmt::Display for DeviceStatsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.unit())
    }
}

impl std::str::FromStr for DeviceStatsKind {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        let input_lower = input.to_lowercase();
        KINDS
            .iter()
            .find(|row| row.name == input_lower || row.aliases.contains(&input_lower.as_str()))
            .map(|row| row.kind)
            .ok_or_else(|| format!("unknown measurement kind {:?}", input))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStats {
    pub kind: DeviceStatsKind,
    pub values: Vec<DeviceStatValues>,
}

/// One series of measurements, newest first. `grid` is the distance between
/// two values in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStatValues {
    pub values: Vec<f64>,
    pub grid: usize,
}

/// Parses the answer of `getbasicdevicestats`. Values the device could not
/// measure (sent as "-") are skipped.
pub fn parse_device_stats(xml: &str) -> Result<Vec<DeviceStats>> {
    let stats = xml::parse_raw_device_stats(xml)?;

    fn process_raw(raw: Option<RawManyStats>, kind: DeviceStatsKind) -> Option<DeviceStats> {
        let multiplier = kind.multiplier();
        raw.map(|raw| DeviceStats {
            kind,
            values: raw
                .stats
                .into_iter()
                .map(|ea| DeviceStatValues {
                    grid: ea.grid,
                    values: ea
                        .values
                        .split(',')
                        .filter_map(|val| val.trim().parse::<f64>().ok().map(|val| val * multiplier))
                        .collect(),
                })
                .collect(),
        })
    }

    Ok([
        process_raw(stats.temperature, DeviceStatsKind::Temperature),
        process_raw(stats.energy, DeviceStatsKind::Energy),
        process_raw(stats.power, DeviceStatsKind::Power),
        process_raw(stats.voltage, DeviceStatsKind::Voltage),
    ]
    .into_iter()
    .flatten()
    .collect())
}
