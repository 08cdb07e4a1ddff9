// Opens the default camera and turns frames into FrameBuffers.
// A photo "work" is one of these frames, exported the same way a drawing is.

use crate::error::Error;
use crate::types::FrameBuffer;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

/// Frames thrown away before a still, so auto-exposure has settled.
pub const WARMUP_FRAMES: usize = 5;

pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution (the driver may pick another).
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        let actual = cam.resolution();
        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// Grab one frame (blocks until the camera delivers it).
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // Pack as 0x00RRGGBB by hand: nokhwa may link its own copy of `image`.
        let (w, h) = rgb_img.dimensions();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for (_x, _y, pixel) in rgb_img.enumerate_pixels() {
            pixels.push(((pixel[0] as u32) << 16) | ((pixel[1] as u32) << 8) | pixel[2] as u32);
        }
        Ok(FrameBuffer { width: w as usize, height: h as usize, pixels })
    }

    /// Take a still photo: skip a few frames, keep the next one.
    pub fn capture_still(&mut self) -> Result<FrameBuffer, Error> {
        for _ in 0..WARMUP_FRAMES {
            self.next_frame()?;
        }
        self.next_frame()
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        // nothing useful to do with a close error while dropping
        let _ = self.cam.stop_stream();
    }
}
