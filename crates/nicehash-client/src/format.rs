/*
[INPUT]:  Endpoint path template and named or positional arguments
[OUTPUT]: Path with {placeholder} tokens substituted
[POS]:    Path formatting - pure helper for endpoint templates
[UPDATE]: When changing placeholder syntax
*/

use regex::{NoExpand, RegexBuilder};

/// Substitution arguments for [`format_path`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathArgs {
    /// `{key}` tokens, matched case-insensitively
    Named(Vec<(String, String)>),
    /// `{0}`, `{1}`, ... tokens by index
    Positional(Vec<String>),
}

impl PathArgs {
    pub fn named<I, K, V>(args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        PathArgs::Named(
            args.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }

    pub fn positional<I, V>(args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        PathArgs::Positional(args.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PathArgs::Named(args) => args.is_empty(),
            PathArgs::Positional(args) => args.is_empty(),
        }
    }
}

impl Default for PathArgs {
    fn default() -> Self {
        PathArgs::Named(Vec::new())
    }
}

/// Replace every `{key}` in `template` with its value.
///
/// Placeholders without a matching argument are left as they are.
pub fn format_path(template: &str, args: &PathArgs) -> String {
    match args {
        PathArgs::Named(pairs) => pairs
            .iter()
            .fold(template.to_string(), |path, (key, value)| {
                substitute(path, key, value)
            }),
        PathArgs::Positional(values) => values
            .iter()
            .enumerate()
            .fold(template.to_string(), |path, (index, value)| {
                substitute(path, &index.to_string(), value)
            }),
    }
}

fn substitute(path: String, key: &str, value: &str) -> String {
    let pattern = format!(r"\{{{}\}}", regex::escape(key));
    let placeholder = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .expect("escaped key inside literal braces always compiles");
    placeholder.replace_all(&path, NoExpand(value)).into_owned()
}
