//! 天气 emoji 标注
//!
//! 两张有序表：
//! - [`CONDITION_EMOJIS`]：描述文本关键字 → 主 emoji，按表顺序取第一个命中项
//! - [`THRESHOLD_RULES`]：数值阈值 → 附加 emoji，逐条判断，命中即追加
//!
//! 阈值按公制数值写死，不随会话单位换算。选了 imperial 时 40°F 同样会被判定为
//! "热"，这是已知限制。

use crate::weather::{ForecastEntry, WeatherRecord};

/// 描述关键字与 emoji 的对应表，顺序即优先级
///
/// 例如 "thunderstorm with light rain" 会先命中 `rain`。
pub const CONDITION_EMOJIS: &[(&str, &str)] = &[
    ("clear", "☀️"),
    ("rain", "🌧️"),
    ("cloud", "☁️"),
    ("snow", "❄️"),
    ("thunderstorm", "⛈️"),
    ("mist", "🌫️"),
    ("fog", "🌫️"),
    ("hot", "🔥"),
    ("cold", "🧊"),
    ("humid", "💦"),
    ("windy", "🍃"),
];

/// 没有任何关键字命中时的主 emoji
pub const DEFAULT_EMOJI: &str = "🌤️";

pub const HOT_ABOVE: f64 = 30.0;
pub const COLD_BELOW: f64 = 0.0;
pub const HUMID_ABOVE: f64 = 80.0;
pub const WINDY_ABOVE: f64 = 15.0;

/// 参与标注的天气读数
#[derive(Debug, Clone, Copy)]
pub struct Conditions<'a> {
    pub description: &'a str,
    pub temperature: f64,
    pub humidity: f64,
    /// 预报条目没有风速
    pub wind_speed: Option<f64>,
}

impl<'a> From<&'a WeatherRecord> for Conditions<'a> {
    fn from(record: &'a WeatherRecord) -> Self {
        Self {
            description: &record.description,
            temperature: record.temperature,
            humidity: record.humidity,
            wind_speed: Some(record.wind_speed),
        }
    }
}

impl<'a> From<&'a ForecastEntry> for Conditions<'a> {
    fn from(entry: &'a ForecastEntry) -> Self {
        Self {
            description: &entry.description,
            temperature: entry.temperature,
            humidity: entry.humidity,
            wind_speed: None,
        }
    }
}

/// 阈值规则
pub struct ThresholdRule {
    pub name: &'static str,
    pub applies: fn(&Conditions<'_>) -> bool,
    pub symbol: &'static str,
}

fn is_hot(c: &Conditions<'_>) -> bool {
    c.temperature > HOT_ABOVE
}

fn is_cold(c: &Conditions<'_>) -> bool {
    c.temperature < COLD_BELOW
}

fn is_humid(c: &Conditions<'_>) -> bool {
    c.humidity > HUMID_ABOVE
}

fn is_windy(c: &Conditions<'_>) -> bool {
    c.wind_speed.is_some_and(|speed| speed > WINDY_ABOVE)
}

/// 附加 emoji 规则表，按顺序追加
pub const THRESHOLD_RULES: &[ThresholdRule] = &[
    ThresholdRule {
        name: "hot",
        applies: is_hot,
        symbol: "🔥",
    },
    ThresholdRule {
        name: "cold",
        applies: is_cold,
        symbol: "🧊",
    },
    ThresholdRule {
        name: "humid",
        applies: is_humid,
        symbol: "💦",
    },
    ThresholdRule {
        name: "windy",
        applies: is_windy,
        symbol: "🍃",
    },
];

/// 根据描述文本选主 emoji（大小写不敏感的子串匹配）
pub fn primary_emoji(description: &str) -> &'static str {
    let description = description.to_lowercase();
    CONDITION_EMOJIS
        .iter()
        .find(|(keyword, _)| description.contains(keyword))
        .map(|(_, symbol)| *symbol)
        .unwrap_or(DEFAULT_EMOJI)
}

/// 主 emoji 加上所有命中的阈值 emoji，空格分隔
pub fn enrich(conditions: &Conditions<'_>) -> String {
    let mut symbols = vec![primary_emoji(conditions.description)];
    symbols.extend(
        THRESHOLD_RULES
            .iter()
            .filter(|rule| (rule.applies)(conditions))
            .map(|rule| rule.symbol),
    );
    symbols.join(" ")
}
