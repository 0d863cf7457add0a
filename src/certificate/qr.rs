//! QR audit payload and raster encoding.

use image::{GrayImage, Luma};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};

use super::model::{PersonalInformation, Reason};
use super::timestamp::Timestamp;

/// Pixels per QR module in the rendered raster.
const MODULE_PX: u32 = 8;

/// Assemble the audit text encoded in the QR image.
///
/// Line set, order and the `";\n "` separator are part of the scanning
/// contract and must match the printed form exactly. Exit date/time equal
/// the creation date/time. Reasons appear as their short codes, joined with
/// a comma and a space, in caller order.
pub fn payload(profile: &PersonalInformation, stamp: &Timestamp, reasons: &[Reason]) -> String {
    let codes: Vec<&str> = reasons.iter().map(|reason| reason.code()).collect();

    [
        format!("Cree le: {} a {}", stamp.date, stamp.time),
        format!("Nom: {}", profile.lastname),
        format!("Prenom: {}", profile.firstname),
        format!("Naissance: {} a {}", profile.birthday, profile.placeofbirth),
        format!("Adresse: {}", profile.full_address()),
        format!("Sortie: {} a {}", stamp.date, stamp.time),
        format!("Motifs: {}", codes.join(", ")),
    ]
    .join(";\n ")
}

/// Encode the payload as a grayscale QR raster.
///
/// Error-correction level M with a one-module quiet margin. A payload too
/// large for level M is a hard failure, never truncated.
pub fn encode(payload: &str) -> Result<GrayImage, QrError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)?;
    let modules = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(MODULE_PX, MODULE_PX)
        .build();

    let (width, height) = modules.dimensions();
    let mut framed = GrayImage::from_pixel(
        width + 2 * MODULE_PX,
        height + 2 * MODULE_PX,
        Luma([255]),
    );
    image::imageops::overlay(&mut framed, &modules, MODULE_PX as i64, MODULE_PX as i64);

    Ok(framed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> PersonalInformation {
        PersonalInformation {
            lastname: "John".to_string(),
            firstname: "Doe".to_string(),
            birthday: "08/08/1987".to_string(),
            placeofbirth: "FarAwayTown".to_string(),
            address: "42 victory street".to_string(),
            zipcode: "42666".to_string(),
            town: "LivingTown".to_string(),
        }
    }

    fn sample_stamp() -> Timestamp {
        Timestamp {
            date: "15/03/2021".to_string(),
            time: "14h30".to_string(),
            for_filename: "2021-03-15_14-30-00".to_string(),
        }
    }

    #[test]
    fn test_payload_layout() {
        let text = payload(&sample_profile(), &sample_stamp(), &[Reason::Work]);
        assert_eq!(
            text,
            "Cree le: 15/03/2021 a 14h30;\n \
             Nom: John;\n \
             Prenom: Doe;\n \
             Naissance: 08/08/1987 a FarAwayTown;\n \
             Adresse: 42 victory street 42666 LivingTown;\n \
             Sortie: 15/03/2021 a 14h30;\n \
             Motifs: travail"
        );
    }

    #[test]
    fn test_payload_joins_reasons_in_caller_order() {
        let text = payload(
            &sample_profile(),
            &sample_stamp(),
            &[Reason::Leisure, Reason::Work],
        );
        assert!(text.ends_with("Motifs: sport_animaux, travail"));
    }

    #[test]
    fn test_empty_reason_set_is_permitted() {
        let text = payload(&sample_profile(), &sample_stamp(), &[]);
        assert!(text.ends_with("Motifs: "));
    }

    #[test]
    fn test_encode_produces_framed_square() {
        let image = encode("Motifs: travail").unwrap();
        let (width, height) = image.dimensions();
        assert_eq!(width, height);
        // the one-module margin is blank
        assert_eq!(image.get_pixel(0, 0), &Luma([255]));
        assert_eq!(image.get_pixel(width - 1, height - 1), &Luma([255]));
        // finder patterns put dark pixels just inside the margin
        assert_eq!(image.get_pixel(MODULE_PX, MODULE_PX), &Luma([0]));
    }
}
