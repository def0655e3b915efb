//! End-to-end banner upload flow: resize -> crop -> commit -> payload.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use image_pipeline::{CropSession, ResizeOptions, UploadForm, resize_bounded};

fn jpeg_upload(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    }));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .unwrap();
    buf
}

#[test]
fn banner_upload_produces_submittable_payload() {
    // 4000x3000 upload, well under the 10 MiB ceiling.
    let upload = jpeg_upload(4000, 3000);
    assert!(upload.len() as u64 <= 10 * 1024 * 1024);

    // Resize stage bounds to 1920x1080.
    let bounded = resize_bounded(&upload, &ResizeOptions::default()).unwrap();
    assert!(bounded.width() <= 1920);
    assert!(bounded.height() <= 1080);

    // Crop an 800-wide 16:9 region and commit.
    let mut session = CropSession::new();
    session.load(bounded);
    session.set_region(100, 80, 800).unwrap();
    let asset = session.commit().unwrap();
    assert!(asset.width() <= 1200);
    assert!(asset.height() <= 675);
    assert_eq!(asset.region.width, 800);
    assert_eq!(asset.region.height, 450);

    // The committed asset lands in the payload as a JPEG data URL.
    let mut form = UploadForm::new();
    form.set_banner(asset);
    form.set_pan_card(jpeg_upload(600, 400));
    form.set_aadhar_card(jpeg_upload(600, 400));
    form.add_clinic_photo("reception.jpg", jpeg_upload(800, 600));
    let payload = form.into_payload().unwrap();

    let banner = payload.banner.expect("banner present");
    assert!(banner.starts_with("data:image/jpeg;base64,"));
    assert!(banner.len() > "data:image/jpeg;base64,".len());
    assert_eq!(payload.clinic_photos.len(), 1);
}
