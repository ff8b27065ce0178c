//! Page geometry: where every element lands on the A4 canvas
//!
//! Coordinates are PDF points with the origin at the bottom-left corner.

use crate::credentials::Credentials;
use crate::render::fonts::Font;
use crate::render::options::{FOOTER_TEXT, RenderOptions};
use crate::theme::{Color, Theme};

/// One millimetre in points
pub const MM: f32 = 72.0 / 25.4;
/// A4 portrait width in points
pub const PAGE_WIDTH: f32 = 210.0 * MM;
/// A4 portrait height in points
pub const PAGE_HEIGHT: f32 = 297.0 * MM;

const TOP_BAR_HEIGHT: f32 = 8.0 * MM;
const QR_FRAME_PADDING: f32 = 10.0 * MM;
const QR_FRAME_RADIUS: f32 = 5.0 * MM;
const INFO_BOX_WIDTH_RATIO: f32 = 0.75;
const INFO_BOX_HEIGHT: f32 = 18.0 * MM;
const INFO_BOX_SPACING: f32 = 4.0 * MM;
const INFO_BOX_RADIUS: f32 = 3.0 * MM;
const INFO_BOX_INSET: f32 = 8.0 * MM;
const FOOTER_MIN_Y: f32 = 15.0 * MM;

/// Section heading above the info boxes
pub const SECTION_TITLE: &str = "Connection Details";
/// Password value shown for open networks
pub const OPEN_PASSWORD_PLACEHOLDER: &str = "(none required)";

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Build a rectangle from its bottom-left corner and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal centre
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Solid, unstroked rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    /// Area
    pub rect: Rect,
    /// Fill color
    pub color: Color,
}

/// Rounded rectangle with fill and 1pt stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    /// Area
    pub rect: Rect,
    /// Corner radius
    pub radius: f32,
    /// Fill color
    pub fill: Color,
    /// Stroke color
    pub stroke: Color,
}

/// A single line of text placed at its baseline origin
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Text content
    pub text: String,
    /// Font face
    pub font: Font,
    /// Size in points
    pub size: f32,
    /// Baseline start x
    pub x: f32,
    /// Baseline y
    pub y: f32,
    /// Fill color
    pub color: Color,
}

impl TextLine {
    fn centered(text: &str, font: Font, size: f32, y: f32, color: Color) -> Self {
        let width = font.text_width(text, size);
        Self {
            text: text.to_string(),
            font,
            size,
            x: (PAGE_WIDTH - width) / 2.0,
            y,
            color,
        }
    }

    /// Rendered width in points
    pub fn width(&self) -> f32 {
        self.font.text_width(&self.text, self.size)
    }
}

/// Labelled detail box
#[derive(Debug, Clone, PartialEq)]
pub struct InfoBox {
    /// Box background and outline
    pub panel: Panel,
    /// Small caption
    pub label: TextLine,
    /// Emphasised value
    pub value: TextLine,
}

/// Fully computed page
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Page background
    pub background: Fill,
    /// Border strips, corner accents and top bar, in paint order
    pub decorations: Vec<Fill>,
    /// Title line
    pub title: TextLine,
    /// Subtitle line, absent when empty
    pub subtitle: Option<TextLine>,
    /// Rounded frame behind the code
    pub qr_frame: Panel,
    /// Where the code image is placed
    pub qr: Rect,
    /// "Connection Details" heading
    pub section_title: TextLine,
    /// Network name, security and password boxes, top to bottom
    pub info_boxes: [InfoBox; 3],
    /// Footer line, absent when disabled or when it would collide
    pub footer: Option<TextLine>,
}

/// Compute the layout for one document.
pub fn compute_layout(
    credentials: &Credentials,
    theme: &Theme,
    options: &RenderOptions,
) -> PageLayout {
    let palette = &theme.palette;
    let layout = &theme.layout;

    let background = Fill {
        rect: Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT),
        color: palette.background,
    };
    let decorations = decorations(theme);

    let qr_edge = PAGE_WIDTH.min(PAGE_HEIGHT) * options.qr_size;
    let top_space = if layout.has_top_bar {
        TOP_BAR_HEIGHT + (15.0 + 18.0 + 12.0 + 8.0) * MM
    } else {
        (18.0 + 12.0 + 8.0) * MM
    };
    let qr = Rect::new(
        (PAGE_WIDTH - qr_edge) / 2.0,
        PAGE_HEIGHT - top_space - qr_edge,
        qr_edge,
        qr_edge,
    );
    let qr_frame = Panel {
        rect: Rect::new(
            qr.x - QR_FRAME_PADDING,
            qr.y - QR_FRAME_PADDING,
            qr.width + 2.0 * QR_FRAME_PADDING,
            qr.height + 2.0 * QR_FRAME_PADDING,
        ),
        radius: QR_FRAME_RADIUS,
        fill: palette.info_box,
        stroke: palette.border,
    };

    let (title_y, title_color) = if layout.has_top_bar {
        (PAGE_HEIGHT - TOP_BAR_HEIGHT - 15.0 * MM, palette.text)
    } else {
        (PAGE_HEIGHT - 20.0 * MM, palette.title)
    };
    let title = TextLine::centered(&options.title, Font::HelveticaBold, 20.0, title_y, title_color);

    let subtitle = (!options.subtitle.is_empty()).then(|| {
        let max_width = qr_frame.rect.width - 20.0 * MM;
        let size = if Font::Helvetica.text_width(&options.subtitle, 11.0) > max_width {
            9.0
        } else {
            11.0
        };
        TextLine::centered(
            &options.subtitle,
            Font::Helvetica,
            size,
            title_y - 18.0 * MM,
            palette.text_secondary,
        )
    });

    let section_y = qr_frame.rect.y - 25.0 * MM;
    let section_title =
        TextLine::centered(SECTION_TITLE, Font::HelveticaBold, 16.0, section_y, palette.text);

    let box_width = PAGE_WIDTH * INFO_BOX_WIDTH_RATIO;
    let box_x = (PAGE_WIDTH - box_width) / 2.0;
    let first_box_y = section_y - 25.0 * MM;
    let box_at = |index: usize| {
        let y = first_box_y - index as f32 * (INFO_BOX_HEIGHT + INFO_BOX_SPACING);
        Panel {
            rect: Rect::new(box_x, y, box_width, INFO_BOX_HEIGHT),
            radius: INFO_BOX_RADIUS,
            fill: palette.info_box,
            stroke: palette.border,
        }
    };
    let label = |panel: &Panel, text: &str| TextLine {
        text: text.to_string(),
        font: Font::HelveticaBold,
        size: 10.0,
        x: panel.rect.x + INFO_BOX_INSET,
        y: panel.rect.y + 11.0 * MM,
        color: palette.text,
    };
    let value = |panel: &Panel, text: &str, font: Font, size: f32, color: Color| TextLine {
        text: text.to_string(),
        font,
        size,
        x: panel.rect.x + INFO_BOX_INSET,
        y: panel.rect.y + 2.0 * MM,
        color,
    };

    let ssid_panel = box_at(0);
    let security_panel = box_at(1);
    let password_panel = box_at(2);

    let security = credentials.security();
    let (password_text, password_font, password_size) = if security.requires_password() {
        let max_width = box_width - 2.0 * INFO_BOX_INSET;
        let size = if Font::CourierBold.text_width(credentials.password(), 13.0) > max_width {
            11.0
        } else {
            13.0
        };
        (credentials.password(), Font::CourierBold, size)
    } else {
        (OPEN_PASSWORD_PLACEHOLDER, Font::Helvetica, 13.0)
    };

    let info_boxes = [
        InfoBox {
            label: label(&ssid_panel, "Network Name (SSID):"),
            value: value(
                &ssid_panel,
                credentials.ssid(),
                Font::HelveticaBold,
                14.0,
                palette.primary,
            ),
            panel: ssid_panel,
        },
        InfoBox {
            label: label(&security_panel, "Security Type:"),
            value: value(
                &security_panel,
                security.label(),
                Font::Helvetica,
                13.0,
                palette.text_secondary,
            ),
            panel: security_panel,
        },
        InfoBox {
            label: label(&password_panel, "Password:"),
            value: value(
                &password_panel,
                password_text,
                password_font,
                password_size,
                if security.requires_password() {
                    palette.primary
                } else {
                    palette.text_secondary
                },
            ),
            panel: password_panel,
        },
    ];

    let footer = options
        .show_footer
        .then(|| (password_panel.rect.y - 18.0 * MM).min(20.0 * MM))
        .filter(|y| *y >= FOOTER_MIN_Y)
        .map(|y| TextLine::centered(FOOTER_TEXT, Font::Helvetica, 9.0, y, palette.text_secondary));

    PageLayout {
        background,
        decorations,
        title,
        subtitle,
        qr_frame,
        qr,
        section_title,
        info_boxes,
        footer,
    }
}

fn decorations(theme: &Theme) -> Vec<Fill> {
    let palette = &theme.palette;
    let layout = &theme.layout;
    let mut fills = Vec::new();

    if layout.has_border && layout.border_width > 0.0 {
        let w = layout.border_width * MM;
        for rect in [
            Rect::new(0.0, 0.0, PAGE_WIDTH, w),
            Rect::new(0.0, PAGE_HEIGHT - w, PAGE_WIDTH, w),
            Rect::new(0.0, 0.0, w, PAGE_HEIGHT),
            Rect::new(PAGE_WIDTH - w, 0.0, w, PAGE_HEIGHT),
        ] {
            fills.push(Fill {
                rect,
                color: palette.primary,
            });
        }

        if layout.corner_size > 0.0 {
            let c = layout.corner_size * MM;
            for (x, y) in [
                (0.0, 0.0),
                (PAGE_WIDTH - c, 0.0),
                (0.0, PAGE_HEIGHT - c),
                (PAGE_WIDTH - c, PAGE_HEIGHT - c),
            ] {
                fills.push(Fill {
                    rect: Rect::new(x, y, c, c),
                    color: palette.secondary,
                });
            }
        }
    }

    if layout.has_top_bar {
        fills.push(Fill {
            rect: Rect::new(0.0, PAGE_HEIGHT - TOP_BAR_HEIGHT, PAGE_WIDTH, TOP_BAR_HEIGHT),
            color: palette.primary,
        });
    }

    fills
}
