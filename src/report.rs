//! Turns form state into terminal text. Everything here is a pure function of
//! [`UiState`] / [`ScanResult`].

use std::fmt::Write as _;

use crate::domain::{ScanResult, UiState};

pub const TITLE: &str = "AI Website Scanner";
pub const SUBTITLE: &str = "Analyze website safety instantly with advanced AI";
pub const PLACEHOLDER: &str = "https://example.com";
pub const NO_THREATS: &str = "No obvious threats detected.";

const BAR_WIDTH: usize = 30;
const RULE: &str = "────────────────────────────────────────";

/// Colour band of the threat score as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Icon shown next to the service's risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskIcon {
    High,
    Medium,
    Low,
}

impl RiskIcon {
    pub fn from_label(risk: &str) -> Self {
        match risk.to_lowercase().as_str() {
            "high" => RiskIcon::High,
            "medium" => RiskIcon::Medium,
            _ => RiskIcon::Low,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            RiskIcon::High => "⛔",
            RiskIcon::Medium => "⚠",
            RiskIcon::Low => "✔",
        }
    }
}

/// Largest magnitude rounded to hundredths; beyond it an `f64` no longer
/// carries two exact decimals.
const MAX_ROUNDED_SCORE: f64 = 1e13;

/// Threat and safety figures derived from one rounding of the raw score, so
/// the two displayed numbers always add up to exactly 100. Scores too large to
/// round exactly are shown as the service sent them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreDisplay {
    Hundredths(i64),
    Raw(f64),
}

impl ScoreDisplay {
    pub fn new(score: f64) -> Self {
        if score.is_finite() && score.abs() <= MAX_ROUNDED_SCORE {
            ScoreDisplay::Hundredths((score * 100.0).round() as i64)
        } else {
            ScoreDisplay::Raw(score)
        }
    }

    /// Raw threat score as shown, without the percent sign.
    pub fn threat(&self) -> String {
        match *self {
            ScoreDisplay::Hundredths(threat) => format_hundredths(threat),
            ScoreDisplay::Raw(score) => score.to_string(),
        }
    }

    /// `100 - score`, shown over 100.
    pub fn safety(&self) -> String {
        match *self {
            ScoreDisplay::Hundredths(threat) => {
                format_hundredths(10_000i64.saturating_sub(threat))
            }
            ScoreDisplay::Raw(score) => (100.0 - score).to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        let (high, medium) = match *self {
            ScoreDisplay::Hundredths(threat) => (threat > 7_500, threat > 4_000),
            ScoreDisplay::Raw(score) => (score > 75.0, score > 40.0),
        };
        if high {
            Severity::High
        } else if medium {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Width of the threat bar, e.g. `"90%"`.
    pub fn bar_width(&self) -> String {
        format!("{}%", self.threat())
    }

    /// Filled share of the threat bar.
    fn bar_fraction(&self) -> f64 {
        match *self {
            ScoreDisplay::Hundredths(threat) => (threat as f64 / 10_000.0).clamp(0.0, 1.0),
            ScoreDisplay::Raw(score) if score > 0.0 => 1.0,
            ScoreDisplay::Raw(_) => 0.0,
        }
    }
}

/// Text of the scan trigger.
pub fn trigger_label(loading: bool) -> &'static str {
    if loading {
        "Analyzing..."
    } else {
        "Scan Website"
    }
}

pub fn render_header() -> String {
    format!("{TITLE}\n{SUBTITLE}\n\nEnter a URL ({PLACEHOLDER}) and press Enter to scan.\n")
}

pub fn render(state: &UiState) -> String {
    match state {
        UiState::Idle => String::new(),
        UiState::Loading => format!("{}\n", trigger_label(true)),
        UiState::Error { message } => format!("{} {message}\n", RiskIcon::High.glyph()),
        UiState::Result(result) => render_result(result),
    }
}

fn render_result(result: &ScanResult) -> String {
    let scores = ScoreDisplay::new(result.score);
    let severity = scores.severity();
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "Risk Level    {} {}",
        RiskIcon::from_label(&result.risk).glyph(),
        capitalize(&result.risk)
    );
    let _ = writeln!(
        out,
        "Safety Score  {}/100 [{}]",
        scores.safety(),
        severity.label()
    );
    let _ = writeln!(out, "Threat Level  {}", scores.bar_width());
    let _ = writeln!(out, "{}", draw_bar(&scores));
    let _ = writeln!(out);
    let _ = writeln!(out, "Analysis Report");
    if result.reasons.is_empty() {
        let _ = writeln!(out, "  {} {NO_THREATS}", RiskIcon::Low.glyph());
    } else {
        for reason in &result.reasons {
            let _ = writeln!(out, "  • {reason}");
        }
    }
    out
}

fn draw_bar(scores: &ScoreDisplay) -> String {
    let fraction = scores.bar_fraction();
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

fn format_hundredths(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let (whole, frac) = (abs / 100, abs % 100);
    if frac == 0 {
        format!("{sign}{whole}")
    } else if frac % 10 == 0 {
        format!("{sign}{whole}.{}", frac / 10)
    } else {
        format!("{sign}{whole}.{frac:02}")
    }
}

fn capitalize(label: &str) -> String {
    label
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
