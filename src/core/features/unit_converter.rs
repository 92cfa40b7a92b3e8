use crate::config::tool_config;
use crate::core::catalog::ToolCategory;
use crate::shared::error::{AppError, AppResult};
use crate::shared::errors::{ERR_CANNOT_PARSE_UNIT, ERR_MISSING_TEXT_PARAM, ERR_UNSUPPORTED_ACTION};
use crate::shared::settings::AppSettings;
use crate::shared::types::{
    ActionType, ConvertUnitsRequest, ConvertUnitsResponse, ExecuteActionResponse, GetUnitsResponse,
    QuickAction, UnitDTO,
};
use super::{FeatureAsync, FeatureSync};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use ts_rs::TS;

// ============================================================================
// Unit tables
// ============================================================================

/// Unit categories served by linear scale tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings.ts")]
pub enum UnitCategory {
    Length,
    Mass,
    Volume,
    Speed,
    Area,
}

impl UnitCategory {
    pub fn all() -> [UnitCategory; 5] {
        [
            UnitCategory::Length,
            UnitCategory::Mass,
            UnitCategory::Volume,
            UnitCategory::Speed,
            UnitCategory::Area,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Length => "length",
            UnitCategory::Mass => "mass",
            UnitCategory::Volume => "volume",
            UnitCategory::Speed => "speed",
            UnitCategory::Area => "area",
        }
    }

    /// Base unit every `scale_to_base` in the category is expressed in
    pub fn base_unit(&self) -> &'static str {
        match self {
            UnitCategory::Length => "m",
            UnitCategory::Mass => "g",
            UnitCategory::Volume => "L",
            UnitCategory::Speed => "m/s",
            UnitCategory::Area => "m²",
        }
    }

    /// Catalog page for this category
    pub fn tool_id(&self) -> &'static str {
        match self {
            UnitCategory::Length => "length-converter",
            UnitCategory::Mass => "weight-converter",
            UnitCategory::Volume => "volume-converter",
            UnitCategory::Speed => "speed-converter",
            UnitCategory::Area => "area-converter",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitCategory::all()
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::Validation(format!("Unknown category: {}", s)))
    }
}

/// A unit with its linear factor into the category's base unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDefinition {
    pub name: String,
    pub symbol: String,
    pub scale_to_base: f64,
}

impl UnitDefinition {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, scale_to_base: f64) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            scale_to_base,
        }
    }
}

/// Ordered, immutable unit table with unique symbols
#[derive(Debug, Clone)]
pub struct UnitTable {
    category: UnitCategory,
    units: Vec<UnitDefinition>,
    index: HashMap<String, usize>,
}

impl UnitTable {
    /// Build a table, rejecting repeated symbols and unusable scale factors.
    pub fn new(category: UnitCategory, units: Vec<UnitDefinition>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(units.len());
        for (i, unit) in units.iter().enumerate() {
            if !(unit.scale_to_base.is_finite() && unit.scale_to_base > 0.0) {
                return Err(AppError::InvalidValue(format!(
                    "scale for '{}' must be positive and finite, got {}",
                    unit.symbol, unit.scale_to_base
                )));
            }
            if index.insert(unit.symbol.clone(), i).is_some() {
                return Err(AppError::DuplicateSymbol(format!(
                    "'{}' appears more than once in the {} table",
                    unit.symbol, category
                )));
            }
        }

        Ok(Self { category, units, index })
    }

    pub fn category(&self) -> UnitCategory {
        self.category
    }

    pub fn get(&self, symbol: &str) -> Option<&UnitDefinition> {
        self.index.get(symbol).map(|&i| &self.units[i])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Units in the order they were supplied
    pub fn units(&self) -> &[UnitDefinition] {
        &self.units
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.symbol.as_str())
    }

    fn lookup(&self, symbol: &str) -> AppResult<&UnitDefinition> {
        self.get(symbol).ok_or_else(|| {
            AppError::UnknownUnit(format!("'{}' is not a {} unit", symbol, self.category))
        })
    }
}

fn static_table(category: UnitCategory, rows: &[(&str, &str, f64)]) -> UnitTable {
    let units = rows
        .iter()
        .map(|(name, symbol, scale)| UnitDefinition::new(*name, *symbol, *scale))
        .collect();
    UnitTable::new(category, units).expect("built-in unit table must be valid")
}

// Length (base: meters)
pub static LENGTH_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    static_table(
        UnitCategory::Length,
        &[
            ("Meters", "m", 1.0),
            ("Kilometers", "km", 1000.0),
            ("Centimeters", "cm", 0.01),
            ("Millimeters", "mm", 0.001),
            ("Feet", "ft", 0.3048),
            ("Inches", "in", 0.0254),
            ("Yards", "yd", 0.9144),
            ("Miles", "mi", 1609.344),
            ("Nautical Miles", "nmi", 1852.0),
            ("Light Years", "ly", 9.461e15),
            ("Astronomical Units", "AU", 1.496e11),
            ("Parsecs", "pc", 3.086e16),
        ],
    )
});

// Mass (base: grams)
pub static MASS_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    static_table(
        UnitCategory::Mass,
        &[
            ("Milligrams", "mg", 0.001),
            ("Grams", "g", 1.0),
            ("Kilograms", "kg", 1000.0),
            ("Metric Tons", "t", 1_000_000.0),
            ("Ounces", "oz", 28.349523125),
            ("Pounds", "lb", 453.59237),
            ("Stones", "st", 6350.29318),
        ],
    )
});

// Volume (base: liters)
pub static VOLUME_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    static_table(
        UnitCategory::Volume,
        &[
            ("Milliliters", "ml", 0.001),
            ("Liters", "L", 1.0),
            ("Cubic Meters", "m³", 1000.0),
            ("Fluid Ounces", "fl-oz", 0.0295735),
            ("Cups", "cup", 0.236588),
            ("Pints", "pint", 0.473176),
            ("Quarts", "quart", 0.946353),
            ("Gallons", "gal", 3.78541),
        ],
    )
});

// Speed (base: m/s)
pub static SPEED_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    static_table(
        UnitCategory::Speed,
        &[
            ("Meters/Second", "m/s", 1.0),
            ("Kilometers/Hour", "km/h", 1.0 / 3.6),
            ("Miles/Hour", "mph", 0.44704),
            ("Feet/Second", "ft/s", 0.3048),
            ("Knots", "kn", 1852.0 / 3600.0),
        ],
    )
});

// Area (base: square meters)
pub static AREA_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    static_table(
        UnitCategory::Area,
        &[
            ("Square Meters", "m²", 1.0),
            ("Square Kilometers", "km²", 1_000_000.0),
            ("Square Centimeters", "cm²", 0.0001),
            ("Hectares", "ha", 10_000.0),
            ("Acres", "ac", 4046.8564224),
            ("Square Feet", "ft²", 0.09290304),
            ("Square Inches", "in²", 0.00064516),
            ("Square Yards", "yd²", 0.83612736),
            ("Square Miles", "mi²", 2_589_988.110336),
        ],
    )
});

pub fn table_for(category: UnitCategory) -> &'static UnitTable {
    match category {
        UnitCategory::Length => &LENGTH_UNITS,
        UnitCategory::Mass => &MASS_UNITS,
        UnitCategory::Volume => &VOLUME_UNITS,
        UnitCategory::Speed => &SPEED_UNITS,
        UnitCategory::Area => &AREA_UNITS,
    }
}

/// Find a symbol in any built-in table
pub fn find_unit(symbol: &str) -> Option<(UnitCategory, &'static UnitDefinition)> {
    UnitCategory::all()
        .into_iter()
        .find_map(|c| table_for(c).get(symbol).map(|def| (c, def)))
}

// ============================================================================
// Engine
// ============================================================================

/// Convert `value` between two units of the same table.
///
/// Identical symbols return `value` untouched; otherwise the value goes through
/// the base unit. The result is not rounded.
pub fn convert(value: f64, from_unit: &str, to_unit: &str, table: &UnitTable) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(AppError::InvalidValue(format!("{} is not a finite number", value)));
    }

    let from_def = table.lookup(from_unit)?;
    let to_def = table.lookup(to_unit)?;

    if from_unit == to_unit {
        return Ok(value);
    }

    let base_value = value * from_def.scale_to_base;
    let result = base_value / to_def.scale_to_base;
    if !result.is_finite() {
        return Err(AppError::InvalidValue(format!(
            "{} {} is out of range in {}",
            value, from_unit, to_unit
        )));
    }

    tracing::debug!(value, from_unit, to_unit, base_value, result, "unit conversion");
    Ok(result)
}

/// Apply an exchange rate where `rate` is "1 source = rate target".
pub fn convert_with_rate(value: f64, rate: f64) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(AppError::InvalidValue(format!("{} is not a finite number", value)));
    }
    if !(rate.is_finite() && rate > 0.0) {
        return Err(AppError::RateUnavailable(format!("rate {} is not a positive number", rate)));
    }
    Ok(value * rate)
}

/// Parse user input into a finite number.
///
/// Surrounding whitespace is ignored and a lone `,` is read as the decimal
/// separator.
pub fn parse_value(input: &str) -> AppResult<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidValue("empty input".to_string()));
    }

    let normalized = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AppError::InvalidValue(format!("'{}' is not a number", trimmed))),
    }
}

static RE_GROUPED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?\d{1,3}(?:,\d{3})+(?:\.\d+)?$").expect("Failed to compile grouped number pattern")
});

/// A number lifted out of free text. "1,200" and "12,345.5" use thousands
/// separators; any other lone comma is a decimal separator ("3,5").
pub fn parse_number_token(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if RE_GROUPED_NUMBER.is_match(raw) {
        return raw.replace(',', "").parse().ok().filter(|v: &f64| v.is_finite());
    }
    parse_value(raw).ok()
}

// Temperature is affine, so it cannot live in a scale table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "C" => Some(TemperatureUnit::Celsius),
            "F" => Some(TemperatureUnit::Fahrenheit),
            "K" => Some(TemperatureUnit::Kelvin),
            _ => None,
        }
    }
}

pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(AppError::InvalidValue(format!("{} is not a finite number", value)));
    }
    if from == to {
        return Ok(value);
    }

    let celsius = match from {
        TemperatureUnit::Celsius => value,
        TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        TemperatureUnit::Kelvin => value - 273.15,
    };

    Ok(match to {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => (celsius * 9.0 / 5.0) + 32.0,
        TemperatureUnit::Kelvin => celsius + 273.15,
    })
}

// ============================================================================
// Results and the page-level pipeline
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult {
    pub value: f64,
    pub precision: u32,
}

impl ConversionResult {
    pub fn formatted(&self) -> String {
        format_fixed(self.value, self.precision)
    }
}

/// What a converter page shows for its current inputs
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Ready(ConversionResult),
    Unavailable(AppError),
}

impl ConversionOutcome {
    pub fn result(&self) -> Option<&ConversionResult> {
        match self {
            ConversionOutcome::Ready(r) => Some(r),
            ConversionOutcome::Unavailable(_) => None,
        }
    }

    /// Text for the result box; empty when nothing can be shown
    pub fn display(&self) -> String {
        match self {
            ConversionOutcome::Ready(r) => r.formatted(),
            ConversionOutcome::Unavailable(_) => String::new(),
        }
    }
}

/// Form state of a unit converter: the raw input and the two selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitConversion {
    pub input: String,
    pub from_unit: String,
    pub to_unit: String,
}

impl UnitConversion {
    pub fn new(input: impl Into<String>, from_unit: impl Into<String>, to_unit: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
        }
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn set_from_unit(&mut self, symbol: impl Into<String>) {
        self.from_unit = symbol.into();
    }

    pub fn set_to_unit(&mut self, symbol: impl Into<String>) {
        self.to_unit = symbol.into();
    }

    /// Exchange the selectors. The input is left alone, so repeated swaps never drift.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from_unit, &mut self.to_unit);
    }

    pub fn compute(&self, table: &UnitTable, precision: u32) -> ConversionOutcome {
        match parse_value(&self.input).and_then(|v| convert(v, &self.from_unit, &self.to_unit, table)) {
            Ok(value) => ConversionOutcome::Ready(ConversionResult { value, precision }),
            Err(e) => {
                tracing::debug!(input = %self.input, from = %self.from_unit, to = %self.to_unit, error = %e, "conversion unavailable");
                ConversionOutcome::Unavailable(e)
            }
        }
    }
}

// ============================================================================
// Number formatting
// ============================================================================

/// Fixed-point text with exactly `precision` decimals, half away from zero.
///
/// Values or scales `Decimal` cannot hold fall back to float formatting.
pub fn format_fixed(value: f64, precision: u32) -> String {
    if let Some(d) = Decimal::from_f64_retain(value) {
        let mut rounded = d.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(precision);
        if rounded.scale() == precision {
            return rounded.to_string();
        }
    }
    format!("{:.*}", precision as usize, value)
}

/// Thousands separators, at most `max_decimals` decimals, trailing zeros stripped.
/// Examples: 130000.0 -> "130,000", 12.5 -> "12.5", 12.567 -> "12.57"
pub fn format_grouped(value: f64, max_decimals: u32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "∞".to_string() } else { "-∞".to_string() };
    }

    let Some(d) = Decimal::from_f64_retain(value) else {
        return format!("{:.*}", max_decimals as usize, value);
    };
    let text = d
        .round_dp_with_strategy(max_decimals.min(28), RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string();

    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let grouped = add_thousands_separators(integer);
    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

fn add_thousands_separators(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}

// ============================================================================
// Free-text quantities ("12 km", "3.5 miles")
// ============================================================================

/// Canonical target of a quick conversion
#[derive(Debug, Clone, Copy, PartialEq)]
enum QuantityUnit {
    Linear(UnitCategory, &'static str),
    Temperature(TemperatureUnit),
}

fn resolve_unit(symbol: &str) -> Option<QuantityUnit> {
    if let Some(t) = TemperatureUnit::from_symbol(symbol) {
        return Some(QuantityUnit::Temperature(t));
    }
    find_unit(symbol).map(|(category, def)| QuantityUnit::Linear(category, def.symbol.as_str()))
}

fn normalize_unit(unit: &str) -> Option<&'static str> {
    let unit_lower = unit.to_lowercase();
    match unit_lower.as_str() {
        // Length
        "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Some("mm"),
        "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => Some("cm"),
        "m" | "meter" | "meters" | "metre" | "metres" => Some("m"),
        "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Some("km"),
        "in" | "inch" | "inches" | "\"" => Some("in"),
        "ft" | "foot" | "feet" | "'" => Some("ft"),
        "yd" | "yard" | "yards" => Some("yd"),
        "mi" | "mile" | "miles" => Some("mi"),
        "nmi" => Some("nmi"),
        "ly" => Some("ly"),
        "au" => Some("AU"),
        "pc" | "parsec" | "parsecs" => Some("pc"),
        // Mass
        "mg" | "milligram" | "milligrams" => Some("mg"),
        "g" | "gram" | "grams" => Some("g"),
        "kg" | "kilogram" | "kilograms" => Some("kg"),
        "t" | "tonne" | "tonnes" => Some("t"),
        "oz" | "ounce" | "ounces" => Some("oz"),
        "lb" | "lbs" | "pound" | "pounds" => Some("lb"),
        "st" | "stone" | "stones" => Some("st"),
        // Volume
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Some("ml"),
        "l" | "liter" | "liters" | "litre" | "litres" => Some("L"),
        "fl-oz" | "floz" => Some("fl-oz"),
        "cup" | "cups" => Some("cup"),
        "pint" | "pints" => Some("pint"),
        "quart" | "quarts" => Some("quart"),
        "gal" | "gallon" | "gallons" => Some("gal"),
        // Speed
        "m/s" => Some("m/s"),
        "km/h" | "kmh" | "kph" => Some("km/h"),
        "mph" | "m/h" => Some("mph"),
        "kn" | "knot" | "knots" => Some("kn"),
        // Area
        "ha" | "hectare" | "hectares" => Some("ha"),
        "ac" | "acre" | "acres" => Some("ac"),
        // Temperature
        "c" | "°c" | "celsius" => Some("C"),
        "f" | "°f" | "fahrenheit" => Some("F"),
        "k" | "kelvin" => Some("K"),
        _ => None,
    }
}

static RE_NUMBER_THEN_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([+-]?\d+(?:,\d+)*(?:\.\d+)?)\s*([a-zA-Z°'"]+(?:/[a-zA-Z]+)?)"#)
        .expect("Failed to compile number-then-unit pattern")
});

static RE_UNIT_THEN_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z°'"]+(?:/[a-zA-Z]+)?)\s*([+-]?\d+(?:,\d+)*(?:\.\d+)?)"#)
        .expect("Failed to compile unit-then-number pattern")
});

/// Extract the first amount/unit pair from free text, e.g. "2km to miles" -> (2.0, "km").
pub fn parse_quantity(text: &str) -> AppResult<(f64, String)> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::InvalidValue("empty input".to_string()));
    }

    if let Some(caps) = RE_NUMBER_THEN_UNIT.captures(text) {
        if let (Some(amount), Some(unit)) = (parse_number_token(&caps[1]), normalize_unit(&caps[2])) {
            return Ok((amount, unit.to_string()));
        }
    }

    if let Some(caps) = RE_UNIT_THEN_NUMBER.captures(text) {
        if let (Some(unit), Some(amount)) = (normalize_unit(&caps[1]), parse_number_token(&caps[2])) {
            return Ok((amount, unit.to_string()));
        }
    }

    tracing::debug!(text, "no quantity found");
    Err(AppError::InvalidValue(format!("{}: {}", ERR_CANNOT_PARSE_UNIT, text)))
}

/// Convert a free-text quantity into `target`, picking the table from the parsed unit.
pub fn convert_quantity(text: &str, target: &str) -> AppResult<(f64, String, f64)> {
    let (amount, source) = parse_quantity(text)?;
    let from = resolve_unit(&source)
        .ok_or_else(|| AppError::UnknownUnit(source.clone()))?;
    let to = resolve_unit(target)
        .or_else(|| normalize_unit(target).and_then(resolve_unit))
        .ok_or_else(|| AppError::UnknownUnit(target.to_string()))?;

    let result = match (from, to) {
        (QuantityUnit::Linear(fc, fs), QuantityUnit::Linear(tc, ts)) if fc == tc => {
            convert(amount, fs, ts, table_for(fc))?
        }
        (QuantityUnit::Temperature(f), QuantityUnit::Temperature(t)) => convert_temperature(amount, f, t)?,
        _ => {
            return Err(AppError::UnknownUnit(format!(
                "cannot convert {} to {}",
                source, target
            )))
        }
    };

    let target_symbol = match to {
        QuantityUnit::Linear(_, s) => s.to_string(),
        QuantityUnit::Temperature(t) => t.symbol().to_string(),
    };
    tracing::debug!(amount, from = %source, to = %target_symbol, result, "quick conversion");
    Ok((amount, target_symbol, result))
}

// ============================================================================
// Feature Implementation
// ============================================================================

#[derive(Clone)]
pub struct UnitConverterFeature;

impl FeatureSync for UnitConverterFeature {
    fn id(&self) -> &str {
        "unit_converter"
    }

    fn tool_ids(&self) -> Vec<&'static str> {
        vec![
            "length-converter",
            "weight-converter",
            "volume-converter",
            "speed-converter",
            "area-converter",
            "temperature-converter",
        ]
    }

    fn quick_actions(&self) -> Vec<QuickAction> {
        vec![
            ("convert_to_m", "Convert to Meters", "m"),
            ("convert_to_km", "Convert to Kilometers", "km"),
            ("convert_to_ft", "Convert to Feet", "ft"),
            ("convert_to_mi", "Convert to Miles", "mi"),
            ("convert_to_kg", "Convert to Kilograms", "kg"),
            ("convert_to_lb", "Convert to Pounds", "lb"),
            ("convert_to_l", "Convert to Liters", "L"),
            ("convert_to_gal", "Convert to Gallons", "gal"),
            ("convert_to_kmh", "Convert to Kilometers/Hour", "km/h"),
            ("convert_to_mph", "Convert to Miles/Hour", "mph"),
            ("convert_to_c", "Convert to Celsius", "C"),
            ("convert_to_f", "Convert to Fahrenheit", "F"),
        ]
        .into_iter()
        .map(|(id, label, target)| QuickAction {
            id: id.to_string(),
            label: label.to_string(),
            description: None,
            action_type: ActionType::ConvertUnit {
                target: target.to_string(),
            },
            tool_id: tool_id_for(target).map(str::to_string),
            category: Some(ToolCategory::UnitConverters),
        })
        .collect()
    }
}

/// Catalog page that hosts conversions into `symbol`
fn tool_id_for(symbol: &str) -> Option<&'static str> {
    match resolve_unit(symbol)? {
        QuantityUnit::Temperature(_) => Some("temperature-converter"),
        QuantityUnit::Linear(category, _) => Some(category.tool_id()),
    }
}

#[async_trait]
impl FeatureAsync for UnitConverterFeature {
    async fn execute_action(
        &self,
        action_type: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse> {
        let ActionType::ConvertUnit { target } = action_type else {
            return Err(AppError::Validation(ERR_UNSUPPORTED_ACTION.to_string()));
        };

        let text = params
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::Validation(ERR_MISSING_TEXT_PARAM.to_string()))?;

        let (_, source_unit) = parse_quantity(text)?;
        let (amount, target_unit, converted) = convert_quantity(text, target)?;

        Ok(ExecuteActionResponse {
            result: format!("{} {}", format_grouped(converted, 2), target_unit),
            metadata: Some(json!({
                "from_unit": source_unit,
                "target_unit": target_unit,
                "original_amount": amount,
                "converted_amount": converted,
            })),
        })
    }
}

// ============================================================================
// Commands - public API for a frontend shell
// ============================================================================

/// All built-in linear units, grouped by category in table order
pub async fn get_all_units_command() -> AppResult<GetUnitsResponse> {
    let units = UnitCategory::all()
        .into_iter()
        .flat_map(|category| {
            table_for(category).units().iter().map(move |def| UnitDTO {
                id: def.symbol.clone(),
                label: def.name.clone(),
                category: category.as_str().to_string(),
            })
        })
        .collect();

    Ok(GetUnitsResponse { units })
}

/// Convert for a frontend shell; without an explicit precision the user's settings decide.
pub async fn convert_units_command(
    settings: &AppSettings,
    request: ConvertUnitsRequest,
) -> AppResult<ConvertUnitsResponse> {
    let category: UnitCategory = request.category.parse()?;
    let value = parse_value(&request.amount)?;
    let result = convert(value, &request.from_unit, &request.to_unit, table_for(category))?;
    let precision = request
        .precision
        .unwrap_or_else(|| tool_config(settings, category.tool_id()).precision);

    Ok(ConvertUnitsResponse {
        result,
        formatted_result: format_fixed(result, precision),
        from_unit: request.from_unit,
        to_unit: request.to_unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        let scale = a.abs().max(b.abs()).max(1.0);
        (a - b).abs() / scale < 1e-9
    }

    #[test]
    fn test_meter_to_feet() {
        let ft = convert(1.0, "m", "ft", &LENGTH_UNITS).unwrap();
        assert!((ft - 3.280840).abs() < 1e-6);
        assert_eq!(format_fixed(ft, 6), "3.280840");
    }

    #[test]
    fn test_centimeters_to_meters() {
        let m = convert(100.0, "cm", "m", &LENGTH_UNITS).unwrap();
        assert!((m - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_identity_is_exact() {
        for category in UnitCategory::all() {
            let table = table_for(category);
            for symbol in table.symbols() {
                for v in [0.0, -3.5, 0.1, 1e-300, 123456.789] {
                    assert_eq!(convert(v, symbol, symbol, table).unwrap(), v);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_every_pair() {
        for category in UnitCategory::all() {
            let table = table_for(category);
            for a in table.symbols() {
                for b in table.symbols() {
                    for v in [1.0, -42.25, 0.003] {
                        let there = convert(v, a, b, table).unwrap();
                        let back = convert(there, b, a, table).unwrap();
                        assert!(close(back, v), "{} {} -> {} -> {}", v, a, b, back);
                    }
                }
            }
        }
    }

    #[test]
    fn test_linearity() {
        let table = &*LENGTH_UNITS;
        for (from, to) in [("mi", "km"), ("in", "nmi"), ("AU", "ly")] {
            let base = convert(7.0, from, to, table).unwrap();
            let scaled = convert(3.0 * 7.0, from, to, table).unwrap();
            assert!(close(scaled, 3.0 * base));
        }
    }

    #[test]
    fn test_unknown_unit() {
        let err = convert(1.0, "m", "furlong", &LENGTH_UNITS).unwrap_err();
        assert!(matches!(err, AppError::UnknownUnit(_)));
        // mass symbol against length table
        let err = convert(1.0, "kg", "m", &LENGTH_UNITS).unwrap_err();
        assert!(matches!(err, AppError::UnknownUnit(_)));
    }

    #[test]
    fn test_non_finite_is_invalid() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = convert(v, "m", "ft", &LENGTH_UNITS).unwrap_err();
            assert!(matches!(err, AppError::InvalidValue(_)));
        }
    }

    #[test]
    fn test_overflow_is_invalid() {
        let err = convert(f64::MAX, "pc", "mm", &LENGTH_UNITS).unwrap_err();
        assert!(matches!(err, AppError::InvalidValue(_)));
    }

    #[test]
    fn test_duplicate_symbols_rejected() {
        let err = UnitTable::new(
            UnitCategory::Length,
            vec![UnitDefinition::new("Meters", "m", 1.0), UnitDefinition::new("Metres", "m", 1.0)],
        )
        .unwrap_err();
        assert!(matches!(err, AppError::DuplicateSymbol(_)));
    }

    #[test]
    fn test_bad_scale_rejected() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = UnitTable::new(UnitCategory::Mass, vec![UnitDefinition::new("Bad", "b", scale)]).unwrap_err();
            assert!(matches!(err, AppError::InvalidValue(_)));
        }
    }

    #[test]
    fn test_table_order_preserved() {
        let symbols: Vec<&str> = LENGTH_UNITS.symbols().collect();
        assert_eq!(&symbols[..4], &["m", "km", "cm", "mm"]);
        assert_eq!(symbols.len(), 12);
    }

    #[test]
    fn test_symbols_unique_across_tables() {
        let mut seen = std::collections::HashSet::new();
        for category in UnitCategory::all() {
            for symbol in table_for(category).symbols() {
                assert!(seen.insert(symbol.to_string()), "{} appears twice", symbol);
            }
        }
    }

    #[test]
    fn test_convert_with_rate() {
        assert_eq!(convert_with_rate(10.0, 1.0).unwrap(), 10.0);
        assert!((convert_with_rate(10.0, 0.92).unwrap() - 9.2).abs() < 1e-12);
        assert!(matches!(convert_with_rate(10.0, 0.0), Err(AppError::RateUnavailable(_))));
        assert!(matches!(convert_with_rate(f64::NAN, 1.0), Err(AppError::InvalidValue(_))));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_value("3,25").unwrap(), 3.25);
        assert_eq!(parse_value("-1e3").unwrap(), -1000.0);
        for bad in ["", "   ", "abc", "NaN", "inf", "1,000.5,2"] {
            assert!(matches!(parse_value(bad), Err(AppError::InvalidValue(_))), "{}", bad);
        }
    }

    #[test]
    fn test_swap_twice_restores_result() {
        let mut form = UnitConversion::new("5", "mi", "km");
        let original = form.compute(&LENGTH_UNITS, 6);

        form.swap();
        assert_eq!((form.from_unit.as_str(), form.to_unit.as_str()), ("km", "mi"));
        assert_eq!(form.input, "5");

        form.swap();
        assert_eq!(form, UnitConversion::new("5", "mi", "km"));
        assert_eq!(form.compute(&LENGTH_UNITS, 6), original);
    }

    #[test]
    fn test_invalid_input_clears_result() {
        let mut form = UnitConversion::new("1", "m", "ft");
        assert_eq!(form.compute(&LENGTH_UNITS, 6).display(), "3.280840");

        form.set_input("abc");
        let outcome = form.compute(&LENGTH_UNITS, 6);
        assert!(outcome.result().is_none());
        assert_eq!(outcome.display(), "");
    }

    #[test]
    fn test_temperature() {
        use TemperatureUnit::*;
        assert!((convert_temperature(100.0, Celsius, Fahrenheit).unwrap() - 212.0).abs() < 1e-9);
        assert!((convert_temperature(32.0, Fahrenheit, Kelvin).unwrap() - 273.15).abs() < 1e-9);
        assert_eq!(convert_temperature(-40.0, Celsius, Celsius).unwrap(), -40.0);
    }

    #[test]
    fn test_format_fixed_pads_and_rounds() {
        assert_eq!(format_fixed(9.2, 4), "9.2000");
        assert_eq!(format_fixed(1.23456789, 6), "1.234568");
        assert_eq!(format_fixed(-2.5, 0), "-3");
        assert_eq!(format_fixed(1000.0, 2), "1000.00");
    }

    #[test]
    fn test_format_fixed_keeps_decimals_near_decimal_limits() {
        let decimals = |text: &str| text.split('.').nth(1).map(str::len);
        assert_eq!(decimals(&format_fixed(7.9e28, 4)), Some(4));
        assert!(format_fixed(7.9e28, 4).starts_with("79"));
        assert_eq!(decimals(&format_fixed(1e20, 28)), Some(28));
        assert!(format_fixed(1e20, 28).starts_with("100000000000000000000."));
        assert_eq!(decimals(&format_fixed(0.5, 30)), Some(30));
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(130000.0, 2), "130,000");
        assert_eq!(format_grouped(12.5, 2), "12.5");
        assert_eq!(format_grouped(12.567, 2), "12.57");
        assert_eq!(format_grouped(-1234567.891, 2), "-1,234,567.89");
        assert_eq!(format_grouped(999.0, 2), "999");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("12 km").unwrap(), (12.0, "km".to_string()));
        assert_eq!(parse_quantity("3.5 miles").unwrap(), (3.5, "mi".to_string()));
        assert_eq!(parse_quantity("2km to miles").unwrap(), (2.0, "km".to_string()));
        assert_eq!(parse_quantity("lbs 10").unwrap(), (10.0, "lb".to_string()));
        assert!(parse_quantity("hello").is_err());
    }

    #[test]
    fn test_parse_quantity_separators() {
        assert_eq!(parse_quantity("1,200 km").unwrap(), (1200.0, "km".to_string()));
        assert_eq!(parse_quantity("12,345.5 m").unwrap(), (12345.5, "m".to_string()));
        assert_eq!(parse_quantity("3,5 km").unwrap(), (3.5, "km".to_string()));
        assert_eq!(parse_quantity("kg 2,000").unwrap(), (2000.0, "kg".to_string()));
    }

    #[test]
    fn test_parse_number_token() {
        assert_eq!(parse_number_token("1,200"), Some(1200.0));
        assert_eq!(parse_number_token("-1,000,000"), Some(-1_000_000.0));
        assert_eq!(parse_number_token("0,75"), Some(0.75));
        assert_eq!(parse_number_token("1,2,3"), None);
    }

    #[test]
    fn test_convert_quantity() {
        let (amount, unit, result) = convert_quantity("1 mile", "km").unwrap();
        assert_eq!(amount, 1.0);
        assert_eq!(unit, "km");
        assert!((result - 1.609344).abs() < 1e-9);

        let (_, unit, result) = convert_quantity("100 celsius", "F").unwrap();
        assert_eq!(unit, "F");
        assert!((result - 212.0).abs() < 1e-9);

        assert!(matches!(convert_quantity("5 kg", "km"), Err(AppError::UnknownUnit(_))));
    }

    #[tokio::test]
    async fn test_execute_action_formats_result() {
        let response = UnitConverterFeature
            .execute_action(
                &ActionType::ConvertUnit { target: "m".to_string() },
                &json!({ "text": "2.5 km" }),
            )
            .await
            .unwrap();
        assert_eq!(response.result, "2,500 m");
    }

    #[tokio::test]
    async fn test_execute_action_requires_text() {
        let err = UnitConverterFeature
            .execute_action(&ActionType::ConvertUnit { target: "m".to_string() }, &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Validation(ERR_MISSING_TEXT_PARAM.to_string()));
    }

    #[tokio::test]
    async fn test_convert_units_command() {
        let response = convert_units_command(&AppSettings::default(), ConvertUnitsRequest {
            amount: "100".to_string(),
            from_unit: "cm".to_string(),
            to_unit: "m".to_string(),
            category: "length".to_string(),
            precision: Some(4),
        })
        .await
        .unwrap();
        assert_eq!(response.formatted_result, "1.0000");
    }

    #[tokio::test]
    async fn test_convert_units_command_uses_settings_precision() {
        let mut settings = AppSettings::default();
        settings.precision.units = 2;
        let request = ConvertUnitsRequest {
            amount: "1".to_string(),
            from_unit: "m".to_string(),
            to_unit: "ft".to_string(),
            category: "length".to_string(),
            precision: None,
        };

        let response = convert_units_command(&settings, request.clone()).await.unwrap();
        assert_eq!(response.formatted_result, "3.28");

        let response = convert_units_command(&AppSettings::default(), request).await.unwrap();
        assert_eq!(response.formatted_result, "3.280840");
    }

    #[tokio::test]
    async fn test_get_all_units_grouped() {
        let response = get_all_units_command().await.unwrap();
        assert_eq!(response.units[0].id, "m");
        assert_eq!(response.units[0].category, "length");
        assert!(response.units.iter().any(|u| u.id == "ha" && u.category == "area"));
    }

    #[test]
    fn test_quick_actions_point_at_catalog() {
        for action in UnitConverterFeature.quick_actions() {
            let tool_id = action.tool_id.expect("every unit action has a page");
            assert!(crate::core::catalog::find_tool(&tool_id).is_some(), "{}", tool_id);
        }
    }
}
