//! Static icon size tables for every supported platform.
//!
//! Each table is ordered; exports and manifests follow that order. File names
//! are relative to the platform folder and may contain a subdirectory
//! (Android density buckets). Apple tables use platform-specific prefixes, so
//! the three of them can share one folder without collisions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// IconSpec
// ============================================================================

/// Extra data a manifest needs for one icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconMeta {
    /// An entry in an asset catalog `Contents.json`.
    Apple {
        idiom: &'static str,
        scale: &'static str,
        size: &'static str,
    },
    /// Listed in the web app manifest's `icons` array.
    WebManifest,
    /// Written to disk but not referenced by any manifest.
    None,
}

/// One output file: its relative path, its exact pixel size and manifest data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    pub filename: &'static str,
    pub pixel_size: u32,
    pub meta: IconMeta,
}

impl IconSpec {
    const fn apple(
        filename: &'static str,
        pixel_size: u32,
        idiom: &'static str,
        scale: &'static str,
        size: &'static str,
    ) -> Self {
        Self {
            filename,
            pixel_size,
            meta: IconMeta::Apple { idiom, scale, size },
        }
    }

    const fn plain(filename: &'static str, pixel_size: u32) -> Self {
        Self {
            filename,
            pixel_size,
            meta: IconMeta::None,
        }
    }

    const fn web_manifest(filename: &'static str, pixel_size: u32) -> Self {
        Self {
            filename,
            pixel_size,
            meta: IconMeta::WebManifest,
        }
    }
}

// ============================================================================
// Tables
// ============================================================================

const IOS_ICONS: &[IconSpec] = &[
    IconSpec::apple("iPhone_20pt@2x.png", 40, "iphone", "2x", "20x20"),
    IconSpec::apple("iPhone_20pt@3x.png", 60, "iphone", "3x", "20x20"),
    IconSpec::apple("iPhone_29pt@2x.png", 58, "iphone", "2x", "29x29"),
    IconSpec::apple("iPhone_29pt@3x.png", 87, "iphone", "3x", "29x29"),
    IconSpec::apple("iPhone_40pt@2x.png", 80, "iphone", "2x", "40x40"),
    IconSpec::apple("iPhone_40pt@3x.png", 120, "iphone", "3x", "40x40"),
    IconSpec::apple("iPhone_60pt@2x.png", 120, "iphone", "2x", "60x60"),
    IconSpec::apple("iPhone_60pt@3x.png", 180, "iphone", "3x", "60x60"),
    IconSpec::apple("iPad_20pt.png", 20, "ipad", "1x", "20x20"),
    IconSpec::apple("iPad_20pt@2x.png", 40, "ipad", "2x", "20x20"),
    IconSpec::apple("iPad_29pt.png", 29, "ipad", "1x", "29x29"),
    IconSpec::apple("iPad_29pt@2x.png", 58, "ipad", "2x", "29x29"),
    IconSpec::apple("iPad_40pt.png", 40, "ipad", "1x", "40x40"),
    IconSpec::apple("iPad_40pt@2x.png", 80, "ipad", "2x", "40x40"),
    IconSpec::apple("iPad_76pt.png", 76, "ipad", "1x", "76x76"),
    IconSpec::apple("iPad_76pt@2x.png", 152, "ipad", "2x", "76x76"),
    IconSpec::apple("iPad_83.5pt@2x.png", 167, "ipad", "2x", "83.5x83.5"),
    IconSpec::apple("App_Store_1024pt.png", 1024, "ios-marketing", "1x", "1024x1024"),
];

const MACOS_ICONS: &[IconSpec] = &[
    IconSpec::apple("icon_16x16.png", 16, "mac", "1x", "16x16"),
    IconSpec::apple("icon_16x16@2x.png", 32, "mac", "2x", "16x16"),
    IconSpec::apple("icon_32x32.png", 32, "mac", "1x", "32x32"),
    IconSpec::apple("icon_32x32@2x.png", 64, "mac", "2x", "32x32"),
    IconSpec::apple("icon_128x128.png", 128, "mac", "1x", "128x128"),
    IconSpec::apple("icon_128x128@2x.png", 256, "mac", "2x", "128x128"),
    IconSpec::apple("icon_256x256.png", 256, "mac", "1x", "256x256"),
    IconSpec::apple("icon_256x256@2x.png", 512, "mac", "2x", "256x256"),
    IconSpec::apple("icon_512x512.png", 512, "mac", "1x", "512x512"),
    IconSpec::apple("icon_512x512@2x.png", 1024, "mac", "2x", "512x512"),
];

const WATCHOS_ICONS: &[IconSpec] = &[
    IconSpec::apple("AppIcon24x24@2x.png", 48, "watch", "2x", "24x24"),
    IconSpec::apple("AppIcon27.5x27.5@2x.png", 55, "watch", "2x", "27.5x27.5"),
    IconSpec::apple("AppIcon29x29@2x.png", 58, "watch", "2x", "29x29"),
    IconSpec::apple("AppIcon29x29@3x.png", 87, "watch", "3x", "29x29"),
    IconSpec::apple("AppIcon40x40@2x.png", 80, "watch", "2x", "40x40"),
    IconSpec::apple("AppIcon44x44@2x.png", 88, "watch", "2x", "44x44"),
    IconSpec::apple("AppIcon50x50@2x.png", 100, "watch", "2x", "50x50"),
    IconSpec::apple("AppIcon86x86@2x.png", 172, "watch", "2x", "86x86"),
    IconSpec::apple("AppIcon98x98@2x.png", 196, "watch", "2x", "98x98"),
    IconSpec::apple("AppIcon108x108@2x.png", 216, "watch", "2x", "108x108"),
];

const ANDROID_ICONS: &[IconSpec] = &[
    IconSpec::plain("mipmap-mdpi/ic_launcher.png", 48),
    IconSpec::plain("mipmap-hdpi/ic_launcher.png", 72),
    IconSpec::plain("mipmap-xhdpi/ic_launcher.png", 96),
    IconSpec::plain("mipmap-xxhdpi/ic_launcher.png", 144),
    IconSpec::plain("mipmap-xxxhdpi/ic_launcher.png", 192),
    IconSpec::plain("ic_launcher-playstore.png", 512),
];

const WEB_ICONS: &[IconSpec] = &[
    IconSpec::plain("favicon-16x16.png", 16),
    IconSpec::plain("favicon-32x32.png", 32),
    IconSpec::plain("favicon-48x48.png", 48),
    IconSpec::plain("favicon-64x64.png", 64),
    IconSpec::plain("apple-touch-icon.png", 180),
    IconSpec::web_manifest("icon-192x192.png", 192),
    IconSpec::web_manifest("icon-512x512.png", 512),
];

// ============================================================================
// Platform
// ============================================================================

/// A target platform for icon export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    #[cfg_attr(feature = "cli", value(name = "macos"))]
    MacOs,
    #[cfg_attr(feature = "cli", value(name = "watchos"))]
    WatchOs,
    Android,
    Web,
}

impl Platform {
    /// Every platform, in export order.
    pub const ALL: [Platform; 5] = [
        Platform::Ios,
        Platform::MacOs,
        Platform::WatchOs,
        Platform::Android,
        Platform::Web,
    ];

    /// The platform's icon table, in export order.
    pub fn icons(&self) -> &'static [IconSpec] {
        match self {
            Self::Ios => IOS_ICONS,
            Self::MacOs => MACOS_ICONS,
            Self::WatchOs => WATCHOS_ICONS,
            Self::Android => ANDROID_ICONS,
            Self::Web => WEB_ICONS,
        }
    }

    /// The output folder name for a non-unified export.
    pub fn folder_name(&self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::MacOs => "macOS",
            Self::WatchOs => "watchOS",
            Self::Android => "Android",
            Self::Web => "Web",
        }
    }

    /// True for the platforms that can share a unified `Apple/` folder.
    pub fn is_apple(&self) -> bool {
        matches!(self, Self::Ios | Self::MacOs | Self::WatchOs)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "macos" => Ok(Self::MacOs),
            "watchos" => Ok(Self::WatchOs),
            "android" => Ok(Self::Android),
            "web" => Ok(Self::Web),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Name of the shared folder used by unified Apple exports.
pub const UNIFIED_APPLE_FOLDER: &str = "Apple";
