//! Shared UI icons and emojis.
//!
//! Each icon falls back to plain ASCII on terminals without emoji support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");
pub static HOURGLASS: Emoji<'_, '_> = Emoji("⏳ ", "...");

// Section indicators
pub static BUG: Emoji<'_, '_> = Emoji("🐛 ", "[BUG]");
pub static BULB: Emoji<'_, '_> = Emoji("💡 ", "[TIP]");
pub static FILE: Emoji<'_, '_> = Emoji("📄 ", "-");
pub static COMMIT: Emoji<'_, '_> = Emoji("🔸 ", "o");
pub static STATS: Emoji<'_, '_> = Emoji("📊 ", "#");
