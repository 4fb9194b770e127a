use serde::Deserialize;
use std::ops::Range;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Movie catalog CSV (`movieId,title,genres`)
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// Ratings CSV (`userId,movieId,rating[,timestamp]`); collaborative
    /// filtering is disabled when the file is missing
    #[serde(default = "default_ratings_path")]
    pub ratings_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// List length used when a request does not specify `top_n`
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Largest accepted `top_n`
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,

    /// Minimum number of ratings for a movie to be a collaborative candidate
    #[serde(default = "default_min_ratings")]
    pub min_ratings: usize,

    /// Catalog slices offered as the three favourite pickers, e.g.
    /// `14930..15200,25055..25255,21100..21200`
    #[serde(default = "default_selection_windows")]
    pub selection_windows: String,
}

fn default_movies_path() -> String {
    "resources/data/movies.csv".to_string()
}

fn default_ratings_path() -> String {
    "resources/data/ratings.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_n() -> usize {
    10
}

fn default_max_top_n() -> usize {
    50
}

fn default_min_ratings() -> usize {
    1
}

fn default_selection_windows() -> String {
    "14930..15200,25055..25255,21100..21200".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            movies_path: default_movies_path(),
            ratings_path: default_ratings_path(),
            host: default_host(),
            port: default_port(),
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
            min_ratings: default_min_ratings(),
            selection_windows: default_selection_windows(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints envy cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_top_n == 0 {
            anyhow::bail!("DEFAULT_TOP_N must be positive");
        }
        if self.default_top_n > self.max_top_n {
            anyhow::bail!(
                "DEFAULT_TOP_N ({}) exceeds MAX_TOP_N ({})",
                self.default_top_n,
                self.max_top_n
            );
        }
        self.parsed_selection_windows()?;
        Ok(())
    }

    /// Parses `selection_windows` into catalog index ranges
    pub fn parsed_selection_windows(&self) -> anyhow::Result<Vec<Range<usize>>> {
        parse_windows(&self.selection_windows)
    }
}

fn parse_windows(raw: &str) -> anyhow::Result<Vec<Range<usize>>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (start, end) = part
                .split_once("..")
                .ok_or_else(|| anyhow::anyhow!("Invalid selection window '{}'", part))?;
            let start: usize = start
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid window start in '{}': {}", part, e))?;
            let end: usize = end
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid window end in '{}': {}", part, e))?;
            if start > end {
                anyhow::bail!("Selection window '{}' is reversed", part);
            }
            Ok(start..end)
        })
        .collect()
}
