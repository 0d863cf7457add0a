//! The certificate generation sequence.

use chrono::{DateTime, Local};
use lopdf::content::Operation;
use lopdf::{dictionary, Document};

use super::model::{PersonalInformation, Reason};
use super::timestamp::Timestamp;
use super::{pdf, qr, GeneratedCertificate, RenderError};

// Overlay resource names; chosen to stay clear of the template's own entries.
const OVERLAY_FONT: &str = "F-att";
const QR_IMAGE: &str = "Im-att";

const FIELD_SIZE: f32 = 11.0;
const MARK_SIZE: f32 = 18.0;

// Page-1 field positions are a pinned contract against the official template.
const NAME_POS: (f32, f32) = (119.0, 696.0);
const BIRTHDAY_POS: (f32, f32) = (119.0, 674.0);
const BIRTHPLACE_POS: (f32, f32) = (297.0, 674.0);
const ADDRESS_POS: (f32, f32) = (133.0, 652.0);
const MARK_X: f32 = 78.0;
const CITY_POS: (f32, f32) = (105.0, 177.0);
const DATE_POS: (f32, f32) = (91.0, 153.0);
const TIME_POS: (f32, f32) = (264.0, 153.0);

// QR placement: a small copy near the top-right of page 1 and a full-size
// copy on the appended page.
const QR_SMALL_SIZE: f32 = 92.0;
const QR_SMALL_RIGHT_MARGIN: f32 = 156.0;
const QR_SMALL_Y: f32 = 100.0;
const QR_LARGE_SIZE: f32 = 300.0;
const QR_LARGE_X: f32 = 50.0;
const QR_LARGE_TOP_OFFSET: f32 = 350.0;

const TITLE: &str = "COVID-19 - Déclaration de déplacement";
const SUBJECT: &str = "Attestation de déplacement dérogatoire";
const KEYWORDS: &str =
    "covid19 covid-19 attestation déclaration déplacement officielle gouvernement";
const PRODUCER: &str = "DNUM/SDIT";
const AUTHOR: &str = "Ministère de l'intérieur";

/// Renders movement certificates for one configured holder.
///
/// Holds only the injected identity and city; every `render` call builds a
/// fresh document from the template bytes and nothing is reused between
/// calls.
pub struct CertificateRenderer {
    profile: PersonalInformation,
    city: String,
}

impl CertificateRenderer {
    pub fn new(profile: PersonalInformation, city: impl Into<String>) -> Self {
        Self {
            profile,
            city: city.into(),
        }
    }

    /// Render a certificate for the given reasons and instant.
    ///
    /// The instant is sampled by the caller, once; date, time and filename
    /// stamp all derive from it.
    pub fn render(
        &self,
        reasons: &[Reason],
        now: DateTime<Local>,
        template: &[u8],
    ) -> Result<GeneratedCertificate, RenderError> {
        let stamp = Timestamp::from_instant(now);

        let mut doc = Document::load_mem(template).map_err(RenderError::TemplateLoad)?;
        let page1 = pdf::first_page(&doc).ok_or(RenderError::EmptyTemplate)?;

        pdf::set_info(
            &mut doc,
            &pdf::DocumentInfo {
                title: TITLE,
                subject: SUBJECT,
                keywords: KEYWORDS,
                producer: PRODUCER,
                creator: "",
                author: AUTHOR,
            },
        );

        pdf::register_helvetica(&mut doc, page1, OVERLAY_FONT)
            .map_err(RenderError::FontEmbed)?;

        let payload = qr::payload(&self.profile, &stamp, reasons);
        let qr_image = qr::encode(&payload)?;
        let qr_id = pdf::add_gray_image(&mut doc, &qr_image);
        pdf::add_resource(&mut doc, page1, "XObject", QR_IMAGE, qr_id)
            .map_err(RenderError::ImageEmbed)?;

        let (page_width, page_height) = pdf::page_size(&doc, page1);

        let mut ops: Vec<Operation> = Vec::new();
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));
        self.push_field(&mut ops, NAME_POS, &self.profile.full_name());
        self.push_field(&mut ops, BIRTHDAY_POS, &self.profile.birthday);
        self.push_field(&mut ops, BIRTHPLACE_POS, &self.profile.placeofbirth);
        self.push_field(&mut ops, ADDRESS_POS, &self.profile.full_address());
        for reason in reasons {
            ops.extend(pdf::text_ops(
                OVERLAY_FONT,
                MARK_SIZE,
                MARK_X,
                reason.checkbox_y(),
                "x",
            ));
        }
        self.push_field(&mut ops, CITY_POS, &self.city);
        self.push_field(&mut ops, DATE_POS, &stamp.date);
        self.push_field(&mut ops, TIME_POS, &stamp.time);
        ops.extend(pdf::image_ops(
            QR_IMAGE,
            page_width - QR_SMALL_RIGHT_MARGIN,
            QR_SMALL_Y,
            QR_SMALL_SIZE,
            QR_SMALL_SIZE,
        ));
        ops.push(Operation::new("Q", vec![]));
        pdf::append_content(&mut doc, page1, ops).map_err(RenderError::Overlay)?;

        let page2_resources = dictionary! {
            "XObject" => dictionary! { QR_IMAGE => qr_id },
        };
        let page2_ops = pdf::image_ops(
            QR_IMAGE,
            QR_LARGE_X,
            page_height - QR_LARGE_TOP_OFFSET,
            QR_LARGE_SIZE,
            QR_LARGE_SIZE,
        );
        pdf::append_page(&mut doc, page_width, page_height, page2_resources, page2_ops)
            .map_err(RenderError::ImageEmbed)?;

        let bytes = pdf::serialize(&mut doc).map_err(RenderError::Serialize)?;
        let filename = format!("attestation-{}.pdf", stamp.for_filename);

        Ok(GeneratedCertificate {
            filename,
            pdf: bytes,
            timestamp: stamp,
        })
    }

    fn push_field(&self, ops: &mut Vec<Operation>, position: (f32, f32), text: &str) {
        ops.extend(pdf::text_ops(
            OVERLAY_FONT,
            FIELD_SIZE,
            position.0,
            position.1,
            text,
        ));
    }
}
