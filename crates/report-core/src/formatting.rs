use crate::error::{ReportError, Result};

// ── Unit systems ──────────────────────────────────────────────────────────────

/// How byte counts are scaled for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    /// Raw byte counts, no scaling.
    None,
    /// Decimal (SI) units, 1000 bytes per step.
    Decimal,
    /// Binary (IEC) units, 1024 bytes per step.
    Iec,
}

impl UnitSystem {
    /// Parse the `--measurement` flag value (`none`, `dec` or `IEC`).
    pub fn from_flag(flag: &str) -> Result<Self> {
        match flag {
            "none" => Ok(Self::None),
            "dec" => Ok(Self::Decimal),
            "IEC" => Ok(Self::Iec),
            other => Err(ReportError::InvalidUnit(other.to_string())),
        }
    }

    /// Bytes-per-step multiplier; `None` when scaling is disabled.
    pub fn multiplier(self) -> Option<u64> {
        match self {
            Self::None => None,
            Self::Decimal => Some(1000),
            Self::Iec => Some(1024),
        }
    }

    /// Short unit symbols indexed by magnitude power.
    fn symbols(self) -> &'static [&'static str] {
        match self {
            Self::None => &["B"],
            Self::Decimal => &["B", "kB", "MB", "GB", "TB", "PB"],
            Self::Iec => &["B", "kiB", "MiB", "GiB", "TiB", "PiB"],
        }
    }

    /// Full unit names indexed by magnitude power.
    fn names(self) -> &'static [&'static str] {
        match self {
            Self::None => &["byte"],
            Self::Decimal => &["byte", "kilobyte", "megabyte", "gigabyte", "terabyte", "petabyte"],
            Self::Iec => &["byte", "kibibyte", "mebibyte", "gibibyte", "tebibyte", "pebibyte"],
        }
    }
}

// ── Scaling ───────────────────────────────────────────────────────────────────

/// A byte count scaled into its display unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledBytes {
    /// The scaled value, e.g. `2.5` for 2,500,000 decimal bytes.
    pub value: f64,
    /// Short unit symbol, e.g. `"MB"`.
    pub symbol: &'static str,
    /// Full unit name, e.g. `"megabyte"`.
    pub name: &'static str,
    /// Magnitude power: `bytes ≈ value * multiplier^power`.
    pub power: u32,
}

/// Scale `bytes` for display in the given unit system.
///
/// The magnitude is chosen by repeated integer division instead of a
/// floating-point logarithm, so exact powers of the multiplier never
/// round down a step and a zero count stays at power 0. The power is
/// clamped to the unit table (petabytes).
///
/// # Examples
///
/// ```
/// use report_core::formatting::{scale_bytes, UnitSystem};
///
/// let scaled = scale_bytes(2_500_000, UnitSystem::Decimal);
/// assert_eq!(scaled.symbol, "MB");
/// assert_eq!(scaled.power, 2);
/// assert_eq!(format!("{:.2}", scaled.value), "2.50");
/// ```
pub fn scale_bytes(bytes: u64, system: UnitSystem) -> ScaledBytes {
    let symbols = system.symbols();
    let names = system.names();

    let Some(mult) = system.multiplier() else {
        return ScaledBytes {
            value: bytes as f64,
            symbol: symbols[0],
            name: names[0],
            power: 0,
        };
    };

    let mut power = 0usize;
    let mut remaining = bytes;
    while remaining >= mult && power + 1 < symbols.len() {
        remaining /= mult;
        power += 1;
    }

    ScaledBytes {
        value: bytes as f64 / mult.pow(power as u32) as f64,
        symbol: symbols[power],
        name: names[power],
        power: power as u32,
    }
}

/// The `(1 megabyte = 1000^2 = 1000000 bytes)` explanation line printed
/// under the grand total; `None` when scaling is disabled.
pub fn magnitude_note(system: UnitSystem, scaled: &ScaledBytes) -> Option<String> {
    let mult = system.multiplier()?;
    Some(format!(
        "(1 {} = {}^{} = {} bytes)",
        scaled.name,
        mult,
        scaled.power,
        mult.pow(scaled.power)
    ))
}

// ── Percentages ───────────────────────────────────────────────────────────────

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use report_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Tests ─────────────────────────────────────────────────────────────────────
