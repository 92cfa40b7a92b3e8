//! Static tool catalog
//!
//! Single source of truth for which tools exist, how they are grouped, and
//! where their pages live.

use crate::shared::error::{AppError, AppResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

/// Tool groups shown on the home page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings.ts")]
pub enum ToolCategory {
    FileConverters,
    UnitConverters,
    Finance,
    TextTools,
    MediaTools,
    DeveloperTools,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct CategoryInfo {
    pub id: ToolCategory,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

impl ToolCategory {
    pub fn all() -> [ToolCategory; 6] {
        [
            ToolCategory::FileConverters,
            ToolCategory::UnitConverters,
            ToolCategory::Finance,
            ToolCategory::TextTools,
            ToolCategory::MediaTools,
            ToolCategory::DeveloperTools,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            ToolCategory::FileConverters => "file-converters",
            ToolCategory::UnitConverters => "unit-converters",
            ToolCategory::Finance => "finance",
            ToolCategory::TextTools => "text-tools",
            ToolCategory::MediaTools => "media-tools",
            ToolCategory::DeveloperTools => "developer-tools",
        }
    }

    pub fn info(&self) -> CategoryInfo {
        let (name, description, icon, color) = match self {
            ToolCategory::FileConverters => ("File Converters", "Convert between document formats", "FileText", "blue"),
            ToolCategory::UnitConverters => ("Unit Converters", "Convert between different units", "Ruler", "green"),
            ToolCategory::Finance => ("Finance Tools", "Currency and financial calculators", "DollarSign", "yellow"),
            ToolCategory::TextTools => ("Text & Code Tools", "Text processing and code utilities", "Code", "purple"),
            ToolCategory::MediaTools => ("Media Tools", "Image and audio processing", "Image", "pink"),
            ToolCategory::DeveloperTools => ("Developer Tools", "Tools for developers", "Terminal", "gray"),
        };
        CategoryInfo {
            id: *self,
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

impl std::str::FromStr for ToolCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolCategory::all()
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown tool category: {}", s)))
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "bindings.ts")]
pub struct ToolDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: ToolCategory,
    pub route: String,
    pub popular: bool,
    pub is_new: bool,
}

struct Entry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: ToolCategory,
    popular: bool,
}

const fn tool(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: ToolCategory,
) -> Entry {
    Entry { id, name, description, icon, category, popular: false }
}

const fn popular(entry: Entry) -> Entry {
    Entry { popular: true, ..entry }
}

const ENTRIES: &[Entry] = {
    use ToolCategory::*;
    &[
        // File converters
        popular(tool("word-to-pdf", "Word to PDF", "Convert Word documents to PDF format", "FileText", FileConverters)),
        tool("excel-to-pdf", "Excel to PDF", "Convert Excel spreadsheets to PDF format", "Table", FileConverters),
        tool("powerpoint-to-pdf", "PowerPoint to PDF", "Convert PowerPoint presentations to PDF format", "Presentation", FileConverters),
        popular(tool("pdf-to-word", "PDF to Word", "Convert PDF files to editable Word documents", "FileText", FileConverters)),
        tool("image-to-pdf", "Image to PDF", "Convert JPG, PNG images to PDF format", "Image", FileConverters),
        tool("pdf-to-image", "PDF to Image", "Convert PDF pages to JPG, PNG images", "Image", FileConverters),
        tool("html-to-pdf", "HTML to PDF", "Convert HTML web pages to PDF format", "Code", FileConverters),
        tool("pdf-compressor", "PDF Compressor", "Reduce PDF file size while maintaining quality", "Compress", FileConverters),
        tool("pdf-merger", "PDF Merger", "Combine multiple PDF files into one", "Merge", FileConverters),
        tool("pdf-splitter", "PDF Splitter", "Split PDF files into separate pages", "Scissors", FileConverters),
        // Unit converters
        popular(tool("length-converter", "Length Converter", "Convert between meters, feet, inches, and more", "Ruler", UnitConverters)),
        tool("weight-converter", "Weight Converter", "Convert between kg, pounds, ounces, and more", "Scale", UnitConverters),
        tool("temperature-converter", "Temperature Converter", "Convert between Celsius, Fahrenheit, and Kelvin", "Thermometer", UnitConverters),
        tool("area-converter", "Area Converter", "Convert between square meters, square feet, acres", "Square", UnitConverters),
        tool("volume-converter", "Volume Converter", "Convert between liters, gallons, cubic meters", "Cube", UnitConverters),
        tool("speed-converter", "Speed Converter", "Convert between km/h, mph, m/s, and more", "Gauge", UnitConverters),
        tool("time-zone-converter", "Time Zone Converter", "Convert time between different time zones", "Clock", UnitConverters),
        // Finance
        popular(tool("currency-converter", "Currency Converter", "Convert between 170+ world currencies with live rates", "DollarSign", Finance)),
        tool("loan-calculator", "Loan Calculator", "Calculate EMI, interest, and loan payments", "Calculator", Finance),
        tool("emi-calculator", "EMI Calculator", "Calculate Equated Monthly Installments", "CreditCard", Finance),
        tool("gst-calculator", "GST Calculator", "Calculate GST, VAT, and tax amounts", "Receipt", Finance),
        // Text & code
        tool("text-case-converter", "Text Case Converter", "Convert text to UPPERCASE, lowercase, camelCase", "Type", TextTools),
        tool("json-formatter", "JSON Formatter", "Format, validate, and beautify JSON data", "Code", TextTools),
        tool("base64-converter", "Base64 Converter", "Encode and decode Base64 strings", "Hash", TextTools),
        tool("html-encoder", "HTML Encoder", "Encode and decode HTML entities", "Code", TextTools),
        tool("qr-code-generator", "QR Code Generator", "Generate QR codes for text, URLs, and more", "QrCode", TextTools),
        tool("barcode-generator", "Barcode Generator", "Generate various barcode formats", "BarChart3", TextTools),
        tool("lorem-ipsum-generator", "Lorem Ipsum Generator", "Generate placeholder text for design", "FileText", TextTools),
        // Media
        tool("image-resizer", "Image Resizer", "Resize and compress images online", "Image", MediaTools),
        tool("image-converter", "Image Converter", "Convert between PNG, JPG, WebP, and more", "Image", MediaTools),
        tool("video-to-audio", "Video to Audio", "Extract audio from video files", "Music", MediaTools),
        tool("audio-converter", "Audio Converter", "Convert between MP3, WAV, AAC formats", "Music", MediaTools),
        // Developer
        tool("hash-generator", "Hash Generator", "Generate MD5, SHA256, SHA512 hashes", "Fingerprint", DeveloperTools),
        tool("uuid-generator", "UUID Generator", "Generate UUIDs and GUIDs", "Hash", DeveloperTools),
        tool("regex-tester", "Regex Tester", "Test and validate regular expressions", "Code", DeveloperTools),
        tool("timestamp-converter", "Timestamp Converter", "Convert between timestamps and dates", "Clock", DeveloperTools),
        tool("color-picker", "Color Picker", "Pick colors and convert between formats", "Palette", DeveloperTools),
        tool("json-diff", "JSON Diff Tool", "Compare and find differences in JSON files", "GitCompare", DeveloperTools),
    ]
};

fn build(entries: &[Entry]) -> AppResult<Vec<ToolDescriptor>> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|e| {
            if !seen.insert(e.id) {
                return Err(AppError::DuplicateSymbol(format!("tool id '{}' listed twice", e.id)));
            }
            Ok(ToolDescriptor {
                id: e.id.to_string(),
                name: e.name.to_string(),
                description: e.description.to_string(),
                icon: e.icon.to_string(),
                category: e.category,
                route: format!("/tools/{}", e.id),
                popular: e.popular,
                is_new: false,
            })
        })
        .collect()
}

static CATALOG: Lazy<Vec<ToolDescriptor>> =
    Lazy::new(|| build(ENTRIES).expect("built-in tool catalog must have unique ids"));

pub fn tools() -> &'static [ToolDescriptor] {
    &CATALOG
}

pub fn categories() -> Vec<CategoryInfo> {
    ToolCategory::all().iter().map(|c| c.info()).collect()
}

pub fn tools_by_category(category: ToolCategory) -> Vec<&'static ToolDescriptor> {
    CATALOG.iter().filter(|t| t.category == category).collect()
}

pub fn popular_tools() -> Vec<&'static ToolDescriptor> {
    CATALOG.iter().filter(|t| t.popular).collect()
}

pub fn new_tools() -> Vec<&'static ToolDescriptor> {
    CATALOG.iter().filter(|t| t.is_new).collect()
}

pub fn find_tool(id: &str) -> Option<&'static ToolDescriptor> {
    CATALOG.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        assert_eq!(tools().len(), ENTRIES.len());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let entries = [
            tool("a", "A", "", "Code", ToolCategory::TextTools),
            tool("a", "A again", "", "Code", ToolCategory::TextTools),
        ];
        assert!(matches!(build(&entries), Err(AppError::DuplicateSymbol(_))));
    }

    #[test]
    fn test_popular_tools() {
        let ids: Vec<&str> = popular_tools().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["word-to-pdf", "pdf-to-word", "length-converter", "currency-converter"]);
        assert!(new_tools().is_empty());
    }

    #[test]
    fn test_by_category_keeps_order() {
        let finance: Vec<&str> = tools_by_category(ToolCategory::Finance).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(finance, vec!["currency-converter", "loan-calculator", "emi-calculator", "gst-calculator"]);
    }

    #[test]
    fn test_find_tool_route() {
        assert_eq!(find_tool("text-case-converter").unwrap().route, "/tools/text-case-converter");
        assert!(find_tool("missing").is_none());
    }

    #[test]
    fn test_category_ids_round_trip_serde() {
        for category in ToolCategory::all() {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.id());
            assert_eq!(category.id().parse::<ToolCategory>().unwrap(), category);
        }
        assert_eq!(categories().len(), 6);
    }
}
