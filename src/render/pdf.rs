//! PDF serialisation of a computed page layout

use crate::error::{Error, Result};
use crate::render::fonts::{Font, encode_win_ansi};
use crate::render::layout::{Fill, PAGE_HEIGHT, PAGE_WIDTH, PageLayout, Panel, TextLine};
use crate::theme::Color;
use image::DynamicImage;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

const QR_IMAGE_NAME: Name<'static> = Name(b"Im1");
const PRODUCER: &str = concat!("wifiqr ", env!("CARGO_PKG_VERSION"));

// Bezier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

/// Serialise `layout` with `qr_image` placed in its QR slot into a single-page PDF.
///
/// The output carries no timestamps, so identical inputs yield identical bytes.
pub fn write_pdf(layout: &PageLayout, qr_image: &DynamicImage, title: &str) -> Result<Vec<u8>> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let page_id = alloc.bump();
    let content_id = alloc.bump();
    let image_id = alloc.bump();
    let info_id = alloc.bump();
    let font_ids: Vec<(Font, Ref)> = Font::ALL.iter().map(|font| (*font, alloc.bump())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(content_id);

        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (font, id) in &font_ids {
                fonts.pair(Name(font.resource_name()), *id);
            }
        }
        resources.x_objects().pair(QR_IMAGE_NAME, image_id);
    }

    for (font, id) in &font_ids {
        pdf.type1_font(*id)
            .base_font(Name(font.base_name()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    write_image(&mut pdf, image_id, qr_image)?;

    let content = page_content(layout);
    pdf.stream(content_id, &content);

    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(PRODUCER));

    Ok(pdf.finish())
}

fn write_image(pdf: &mut Pdf, id: Ref, image: &DynamicImage) -> Result<()> {
    let width = i32::try_from(image.width())
        .map_err(|_| Error::Pdf(format!("QR image too wide: {}", image.width())))?;
    let height = i32::try_from(image.height())
        .map_err(|_| Error::Pdf(format!("QR image too tall: {}", image.height())))?;

    let gray = matches!(image, DynamicImage::ImageLuma8(_));
    let samples = if gray {
        image.to_luma8().into_raw()
    } else {
        image.to_rgb8().into_raw()
    };

    let mut xobject = pdf.image_xobject(id, &samples);
    xobject.width(width);
    xobject.height(height);
    if gray {
        xobject.color_space().device_gray();
    } else {
        xobject.color_space().device_rgb();
    }
    xobject.bits_per_component(8);
    xobject.finish();
    Ok(())
}

fn page_content(layout: &PageLayout) -> Vec<u8> {
    let mut content = Content::new();

    fill_rect(&mut content, &layout.background);
    for fill in &layout.decorations {
        fill_rect(&mut content, fill);
    }

    rounded_panel(&mut content, &layout.qr_frame);

    let qr = layout.qr;
    content.save_state();
    content.transform([qr.width, 0.0, 0.0, qr.height, qr.x, qr.y]);
    content.x_object(QR_IMAGE_NAME);
    content.restore_state();

    text(&mut content, &layout.title);
    if let Some(subtitle) = &layout.subtitle {
        text(&mut content, subtitle);
    }
    text(&mut content, &layout.section_title);

    for info in &layout.info_boxes {
        rounded_panel(&mut content, &info.panel);
        text(&mut content, &info.label);
        text(&mut content, &info.value);
    }

    if let Some(footer) = &layout.footer {
        text(&mut content, footer);
    }

    content.finish().to_vec()
}

fn set_fill(content: &mut Content, color: Color) {
    let [r, g, b] = color.unit();
    content.set_fill_rgb(r, g, b);
}

fn fill_rect(content: &mut Content, fill: &Fill) {
    set_fill(content, fill.color);
    let rect = fill.rect;
    content.rect(rect.x, rect.y, rect.width, rect.height);
    content.fill_nonzero();
}

fn rounded_panel(content: &mut Content, panel: &Panel) {
    let rect = panel.rect;
    let r = panel.radius.min(rect.width / 2.0).min(rect.height / 2.0);
    let k = r * KAPPA;
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.x + rect.width, rect.y + rect.height);

    set_fill(content, panel.fill);
    let [sr, sg, sb] = panel.stroke.unit();
    content.set_stroke_rgb(sr, sg, sb);
    content.set_line_width(1.0);

    content.move_to(x0 + r, y0);
    content.line_to(x1 - r, y0);
    content.cubic_to(x1 - r + k, y0, x1, y0 + r - k, x1, y0 + r);
    content.line_to(x1, y1 - r);
    content.cubic_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1);
    content.line_to(x0 + r, y1);
    content.cubic_to(x0 + r - k, y1, x0, y1 - r + k, x0, y1 - r);
    content.line_to(x0, y0 + r);
    content.cubic_to(x0, y0 + r - k, x0 + r - k, y0, x0 + r, y0);
    content.close_path();
    content.fill_nonzero_and_stroke();
}

fn text(content: &mut Content, line: &TextLine) {
    set_fill(content, line.color);
    let encoded = encode_win_ansi(&line.text);
    content.begin_text();
    content.set_font(Name(line.font.resource_name()), line.size);
    content.next_line(line.x, line.y);
    content.show(Str(&encoded));
    content.end_text();
}
