/// Color tier of the relevance gauge. Upper boundaries are exclusive: a
/// score of exactly 90 is Mid, exactly 80 is Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeTier {
    /// Above 90.
    High,
    /// Above 80, up to and including 90.
    Mid,
    /// 80 and below, and anything unparseable.
    Low,
}

/// What the gauge displays for one score: fill percentage and color tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReading {
    /// Clamped to 0..=100.
    pub fill: f32,
    pub tier: GaugeTier,
}

/// Parses the numeric prefix of a percentage-formatted score ("93.50%").
/// None when the string has no numeric prefix ("N/A").
pub fn parse_score(score: &str) -> Option<f32> {
    let trimmed = score.trim();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<f32>().ok()
}

pub fn read_score(score: &str) -> GaugeReading {
    match parse_score(score) {
        Some(value) => GaugeReading {
            fill: value.clamp(0.0, 100.0),
            tier: tier_for(value),
        },
        None => GaugeReading {
            fill: 0.0,
            tier: GaugeTier::Low,
        },
    }
}

fn tier_for(value: f32) -> GaugeTier {
    if value > 90.0 {
        GaugeTier::High
    } else if value > 80.0 {
        GaugeTier::Mid
    } else {
        GaugeTier::Low
    }
}

#[test]
fn test_parse_score_numeric_prefix() {
    assert_eq!(parse_score("93.50%"), Some(93.5));
    assert_eq!(parse_score(" 80% "), Some(80.0));
    assert_eq!(parse_score("N/A"), None);
    assert_eq!(parse_score(""), None);
}

#[test]
fn test_tier_boundaries() {
    assert_eq!(read_score("93.50%").tier, GaugeTier::High);
    assert_eq!(read_score("90.00%").tier, GaugeTier::Mid);
    assert_eq!(read_score("85%").tier, GaugeTier::Mid);
    assert_eq!(read_score("80.00%").tier, GaugeTier::Low);
    assert_eq!(read_score("12%").tier, GaugeTier::Low);
}

#[test]
fn test_bad_scores_keep_the_bar_sane() {
    let unknown = read_score("N/A");
    assert_eq!(unknown.fill, 0.0);
    assert_eq!(unknown.tier, GaugeTier::Low);

    let overrange = read_score("150%");
    assert_eq!(overrange.fill, 100.0);
    assert_eq!(overrange.tier, GaugeTier::High);

    let negative = read_score("-3%");
    assert_eq!(negative.fill, 0.0);
    assert_eq!(negative.tier, GaugeTier::Low);
}
