//! Icon tags used by the static content.
//!
//! Tags form a closed set. An unknown tag in a content file is a load error,
//! never a silent fallback to some default glyph.

use serde::{Deserialize, Serialize};

/// How the frontend should draw an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconDescriptor {
    /// Kebab-case glyph name in the frontend's icon set.
    pub glyph: &'static str,
    /// Accessible label.
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillIcon {
    Code,
    Code2,
    Smartphone,
    Coffee,
    Globe,
    Database,
    Atom,
    Server,
    Brain,
    BarChart3,
    TrendingUp,
    Video,
    Figma,
    Image,
    Box,
    Boxes,
    Zap,
}

impl SkillIcon {
    pub const ALL: [SkillIcon; 17] = [
        SkillIcon::Code,
        SkillIcon::Code2,
        SkillIcon::Smartphone,
        SkillIcon::Coffee,
        SkillIcon::Globe,
        SkillIcon::Database,
        SkillIcon::Atom,
        SkillIcon::Server,
        SkillIcon::Brain,
        SkillIcon::BarChart3,
        SkillIcon::TrendingUp,
        SkillIcon::Video,
        SkillIcon::Figma,
        SkillIcon::Image,
        SkillIcon::Box,
        SkillIcon::Boxes,
        SkillIcon::Zap,
    ];

    pub const fn descriptor(self) -> IconDescriptor {
        let (glyph, label) = match self {
            SkillIcon::Code => ("code", "Code"),
            SkillIcon::Code2 => ("code-2", "Code"),
            SkillIcon::Smartphone => ("smartphone", "Mobile"),
            SkillIcon::Coffee => ("coffee", "Java"),
            SkillIcon::Globe => ("globe", "Web"),
            SkillIcon::Database => ("database", "Database"),
            SkillIcon::Atom => ("atom", "React"),
            SkillIcon::Server => ("server", "Server"),
            SkillIcon::Brain => ("brain", "Machine learning"),
            SkillIcon::BarChart3 => ("bar-chart-3", "Data analysis"),
            SkillIcon::TrendingUp => ("trending-up", "Modeling"),
            SkillIcon::Video => ("video", "Video"),
            SkillIcon::Figma => ("figma", "Design"),
            SkillIcon::Image => ("image", "Image editing"),
            SkillIcon::Box => ("box", "3D"),
            SkillIcon::Boxes => ("boxes", "Audio"),
            SkillIcon::Zap => ("zap", "Editing"),
        };
        IconDescriptor { glyph, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialIcon {
    Mail,
    Github,
    Linkedin,
    Palette,
}

impl SocialIcon {
    pub const fn descriptor(self) -> IconDescriptor {
        let (glyph, label) = match self {
            SocialIcon::Mail => ("mail", "Email"),
            SocialIcon::Github => ("github", "GitHub"),
            SocialIcon::Linkedin => ("linkedin", "LinkedIn"),
            SocialIcon::Palette => ("palette", "Portfolio"),
        };
        IconDescriptor { glyph, label }
    }
}
