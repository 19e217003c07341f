use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which option vocabulary a selection uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    #[serde(alias = "colour")]
    Color,
    Number,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Color => "color",
            GameType::Number => "number",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" => Ok(GameType::Color),
            "number" => Ok(GameType::Number),
            other => Err(anyhow::anyhow!(
                "unknown game type '{}', expected 'color' or 'number'",
                other
            )),
        }
    }
}

/// Backend vocabulary for the trade kind. Note the British spelling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Colour,
    Number,
}

impl From<GameType> for TradeType {
    fn from(game_type: GameType) -> Self {
        match game_type {
            GameType::Color => TradeType::Colour,
            GameType::Number => TradeType::Number,
        }
    }
}

/// Envelope wrapping every backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}
