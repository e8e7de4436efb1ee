//! Shared UI icons.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[WARN]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");

// Stage indicators
pub static RUNNING: Emoji<'_, '_> = Emoji("▶️  ", "[>]");
pub static FALLBACK: Emoji<'_, '_> = Emoji("🔁 ", "[FB]");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "[DEPLOY]");
pub static RESET: Emoji<'_, '_> = Emoji("🔄 ", "[RESET]");

// File indicators
pub static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
pub static FILE_NEW: Emoji<'_, '_> = Emoji("📄 ", "+");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "[T]");
