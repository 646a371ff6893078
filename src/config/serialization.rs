//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

/// Quote and escape a string as a TOML basic string
fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

impl Config {
    /// Serialize menu entries as `[[menu]]` tables
    pub(super) fn menu_to_toml(&self) -> String {
        let mut output = String::new();
        for item in &self.menu {
            output.push_str("\n[[menu]]\n");
            output.push_str(&format!("label = {}\n", quoted(&item.label)));
            output.push_str(&format!("url = {}\n", quoted(&item.url)));
        }
        output
    }

    /// Render the full config file. Optional values that are unset are
    /// written as comments so the template documents them.
    pub fn to_toml(&self) -> String {
        let site = &self.site;
        let stylesheet = match &site.stylesheet {
            Some(url) => format!("stylesheet = {}", quoted(url)),
            None => "# stylesheet = \"/assets/css/main.css\"".to_string(),
        };

        let cookie_secret = match &self.comments.cookie_secret {
            Some(secret) => format!("cookie_secret = {}", quoted(secret)),
            None => "# cookie_secret = \"change-me\"".to_string(),
        };

        format!(
            r#"# ott-trendy configuration
# Precedence: environment variables > this file > built-in defaults

# Address the site listens on (env: OTT_BIND)
bind_addr = {bind_addr}

# SQLite content database (env: OTT_DB_PATH)
db_path = {db_path}

[site]
# Site name shown in header, footer and page titles (env: OTT_SITE_NAME)
name = {name}
description = {description}
language = {language}
home_heading = {home_heading}
home_tagline = {home_tagline}
attribution = {attribution}
{stylesheet}
posts_per_page = {posts_per_page}
# Automatic excerpts keep this many words, then append excerpt_more
excerpt_length = {excerpt_length}
excerpt_more = {excerpt_more}
# Hours east of UTC used for displayed dates and date archives
utc_offset_hours = {utc_offset_hours}

[comments]
# Replies deeper than this are shown flat at this level
max_depth = {max_depth}
# Hold new comments for approval
moderation = {moderation}
# Signs the comment author cookie; random per process when unset (env: OTT_COOKIE_SECRET)
{cookie_secret}

[logging]
# trace, debug, info, warn, error (RUST_LOG overrides)
level = {level}
file_enabled = {file_enabled}
file_dir = {file_dir}
# hourly, daily, never
file_rotation = {file_rotation}
file_prefix = {file_prefix}
{menu}"#,
            bind_addr = quoted(&self.bind_addr.to_string()),
            db_path = quoted(&self.db_path.display().to_string()),
            name = quoted(&site.name),
            description = quoted(&site.description),
            language = quoted(&site.language),
            home_heading = quoted(&site.home_heading),
            home_tagline = quoted(&site.home_tagline),
            attribution = quoted(&site.attribution),
            stylesheet = stylesheet,
            posts_per_page = site.posts_per_page,
            excerpt_length = site.excerpt_length,
            excerpt_more = quoted(&site.excerpt_more),
            utc_offset_hours = site.utc_offset_hours,
            max_depth = self.comments.max_depth,
            moderation = self.comments.moderation,
            cookie_secret = cookie_secret,
            level = quoted(&self.logging.level),
            file_enabled = self.logging.file_enabled,
            file_dir = quoted(&self.logging.file_dir.display().to_string()),
            file_rotation = quoted(self.logging.file_rotation.as_str()),
            file_prefix = quoted(&self.logging.file_prefix),
            menu = self.menu_to_toml(),
        )
    }
}
