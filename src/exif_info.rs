use exif::{Exif, In, Tag, Value};

use crate::constants::COMMENT_WRAP;

/// The few EXIF fields a photographer checks during a shoot.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExifSummary {
    pub model: Option<String>,
    pub lens: Option<String>,
    pub exposure_time: Option<(u32, u32)>,
    pub aperture: Option<(u32, u32)>,
    pub iso: Option<u32>,
    pub bias: Option<(i32, i32)>,
    pub focal_length: Option<(u32, u32)>,
    pub metering_mode: Option<u32>,
    pub program: Option<u32>,
    pub exposure_mode: Option<u32>,
    pub comment: Option<String>,
}

impl ExifSummary {
    pub fn from_exif(exif: &Exif) -> Self {
        let field = move |tag| exif.get_field(tag, In::PRIMARY).map(|f| &f.value);
        Self {
            model: field(Tag::Model).and_then(ascii),
            lens: field(Tag::LensModel).and_then(ascii),
            exposure_time: field(Tag::ExposureTime).and_then(rational),
            aperture: field(Tag::FNumber).and_then(rational),
            iso: field(Tag::PhotographicSensitivity).and_then(|v| v.get_uint(0)),
            bias: field(Tag::ExposureBiasValue).and_then(srational),
            focal_length: field(Tag::FocalLength).and_then(rational),
            metering_mode: field(Tag::MeteringMode).and_then(|v| v.get_uint(0)),
            program: field(Tag::ExposureProgram).and_then(|v| v.get_uint(0)),
            exposure_mode: field(Tag::ExposureMode).and_then(|v| v.get_uint(0)),
            comment: field(Tag::UserComment).and_then(|v| user_comment(v, exif.little_endian())),
        }
    }

    /// Text block for the overlay: headline lines first, then aligned
    /// `label: value` rows ending with the file name and display time.
    pub fn lines(&self, name: &str, time: &str, show_comment: bool) -> Vec<String> {
        let mut lines = Vec::new();
        lines.extend(self.model.clone());
        lines.extend(self.lens.clone());

        let exposure = self.exposure_time.map(|(n, d)| format_exposure_time(n, d));
        let aperture = self.aperture.map(|(n, d)| format_aperture(n, d));
        if let (Some(exposure), Some(aperture), Some(iso)) = (&exposure, &aperture, self.iso) {
            lines.push(format!("{exposure} at {aperture}, ISO {iso}"));
        }
        if show_comment {
            if let Some(comment) = &self.comment {
                lines.extend(wrap(comment, COMMENT_WRAP));
            }
        }
        lines.push(String::new());

        let mut rows: Vec<(&str, String)> = Vec::new();
        rows.extend(self.bias.map(|(n, d)| ("EV", format_bias(n, d))));
        rows.extend(exposure.map(|v| ("Exposure Time", v)));
        rows.extend(aperture.map(|v| ("Aperture", v)));
        rows.extend(self.iso.map(|v| ("ISO", v.to_string())));
        rows.extend(self.focal_length.map(|(n, d)| ("Focal Length", format!("{}mm", decimal(n as f64 / d.max(1) as f64)))));
        rows.extend(self.metering_mode.map(|v| ("Metering Mode", metering_mode_name(v).to_string())));
        rows.extend(self.program.map(|v| ("Program", program_name(v).to_string())));
        rows.extend(self.exposure_mode.map(|v| ("Exposure Mode", exposure_mode_name(v).to_string())));
        rows.push(("Name", name.to_string()));
        rows.push(("Time", time.to_string()));

        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;
        for (label, value) in rows {
            lines.push(format!("{:width$} {}", format!("{label}:"), value));
        }
        lines
    }
}

fn ascii(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn rational(value: &Value) -> Option<(u32, u32)> {
    match value {
        Value::Rational(values) => values.first().map(|r| (r.num, r.denom)),
        _ => None,
    }
}

fn srational(value: &Value) -> Option<(i32, i32)> {
    match value {
        Value::SRational(values) => values.first().map(|r| (r.num, r.denom)),
        _ => None,
    }
}

/// Decodes an EXIF UserComment: 8 bytes of character code, then the text.
fn user_comment(value: &Value, little_endian: bool) -> Option<String> {
    let Value::Undefined(bytes, _) = value else {
        return None;
    };
    if bytes.len() < 8 {
        return None;
    }
    let (code, data) = bytes.split_at(8);
    let text = if code == b"UNICODE\0" {
        let units: Vec<u16> = data
            .chunks_exact(2)
            .map(|pair| {
                if little_endian {
                    u16::from_le_bytes([pair[0], pair[1]])
                } else {
                    u16::from_be_bytes([pair[0], pair[1]])
                }
            })
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(data).into_owned()
    };
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    (!text.is_empty()).then(|| text.to_string())
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Formats a number with at most two decimals and no trailing zeros.
fn decimal(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn format_exposure_time(num: u32, denom: u32) -> String {
    let denom = denom.max(1);
    if num < denom {
        let g = gcd(num as u64, denom as u64).max(1);
        format!("{}/{} sec", num as u64 / g, denom as u64 / g)
    } else {
        format!("{} sec", decimal(num as f64 / denom as f64))
    }
}

pub fn format_aperture(num: u32, denom: u32) -> String {
    format!("f/{}", decimal(num as f64 / denom.max(1) as f64))
}

/// Exposure bias as a signed mixed fraction, e.g. `+1 1/3` or `-2/3`.
pub fn format_bias(num: i32, denom: i32) -> String {
    let sign = if (num < 0) != (denom < 0) && num != 0 { '-' } else { '+' };
    let num = num.unsigned_abs() as u64;
    let denom = (denom.unsigned_abs() as u64).max(1);
    let whole = num / denom;
    let rest = num % denom;
    if rest == 0 {
        return format!("{sign}{whole}");
    }
    let g = gcd(rest, denom);
    let fraction = format!("{}/{}", rest / g, denom / g);
    if whole == 0 {
        format!("{sign}{fraction}")
    } else {
        format!("{sign}{whole} {fraction}")
    }
}

pub fn metering_mode_name(value: u32) -> &'static str {
    match value {
        0 => "Unknown",
        1 => "Average",
        2 => "CenterWeightedAverage",
        3 => "Spot",
        4 => "MultiSpot",
        5 => "Pattern",
        6 => "Partial",
        255 => "other",
        _ => "Undefined",
    }
}

pub fn program_name(value: u32) -> &'static str {
    match value {
        0 => "Not defined",
        1 => "Manual",
        2 => "Normal",
        3 => "Aperture",
        4 => "Shutter",
        5 => "Creative",
        6 => "Action",
        7 => "Portrait",
        8 => "Landscape",
        _ => "Undefined",
    }
}

pub fn exposure_mode_name(value: u32) -> &'static str {
    match value {
        0 => "Auto",
        1 => "Manual",
        2 => "Auto bracket",
        _ => "Undefined",
    }
}

/// Greedy word wrap at `width` columns.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
