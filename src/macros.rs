/// `&'static Selector` for a CSS selector literal, parsed on first use.
#[macro_export]
macro_rules! selector {
    ($selector: literal) => {{
        static SELECTOR: ::once_cell::sync::Lazy<::scraper::Selector> =
            ::once_cell::sync::Lazy::new(|| {
                ::scraper::Selector::parse($selector)
                    .unwrap_or_else(|e| panic!("Invalid selector {:?}: {e}", $selector))
            });
        &*SELECTOR
    }};
}

/// `&'static Regex` for a pattern literal, compiled on first use.
#[macro_export]
macro_rules! regex {
    ($pattern: literal) => {{
        static PATTERN: ::once_cell::sync::Lazy<::regex::Regex> =
            ::once_cell::sync::Lazy::new(|| {
                ::regex::Regex::new($pattern)
                    .unwrap_or_else(|e| panic!("Invalid pattern {:?}: {e}", $pattern))
            });
        &*PATTERN
    }};
}
