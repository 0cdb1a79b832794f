//! Screen addresses: `starred`, `browse[?filter=..&q=..]`, `details?name=..`.

use crate::api::FilterKind;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub path: String,
    pub query: HashMap<String, String>,
}

impl Address {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().trim_start_matches('/');
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(k), decode(v))
            })
            .collect();
        Self {
            path: path.trim_end_matches(".html").to_ascii_lowercase(),
            query,
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    match urlencoding::decode(&s) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => s.clone(),
    }
}

/// Where the user is. Unknown paths fall back to the starred list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Starred,
    Browse { filter: FilterKind, query: String },
    /// `name` is `None` when the parameter is missing or empty.
    Details { name: Option<String> },
}

impl Route {
    pub fn from_address(address: &Address) -> Self {
        match address.path.as_str() {
            "browse" | "index" => {
                let filter = address
                    .param("filter")
                    .and_then(|f| f.parse().ok())
                    .unwrap_or(FilterKind::All);
                let query = address.param("q").unwrap_or_default().to_string();
                Route::Browse { filter, query }
            }
            "details" | "full_details" => Route::Details {
                name: address
                    .param("name")
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(String::from),
            },
            _ => Route::Starred,
        }
    }

    pub fn parse(raw: &str) -> Self {
        Self::from_address(&Address::parse(raw))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Starred => write!(f, "starred"),
            Route::Browse { filter, query } if query.is_empty() => {
                write!(f, "browse?filter={}", filter.label())
            }
            Route::Browse { filter, query } => write!(
                f,
                "browse?filter={}&q={}",
                filter.label(),
                urlencoding::encode(query)
            ),
            Route::Details { name: Some(name) } => {
                write!(f, "details?name={}", urlencoding::encode(name))
            }
            Route::Details { name: None } => write!(f, "details"),
        }
    }
}
