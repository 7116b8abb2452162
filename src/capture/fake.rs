use super::device::{CameraDevice, VideoStream};
use crate::error::{CameraError, CaptureError};
use image::{Rgb, RgbImage};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Counters shared between a test and the fake camera it hands out.
#[derive(Default)]
pub struct FakeCameraProbe {
    pub opens: Cell<u32>,
    pub releases: Cell<u32>,
    pub frames: Cell<u32>,
    pub fail_open: RefCell<Option<CameraError>>,
    pub disconnected: Cell<bool>,
}

impl FakeCameraProbe {
    pub fn live_streams(&self) -> u32 {
        self.opens.get() - self.releases.get()
    }
}

pub struct FakeCamera {
    probe: Rc<FakeCameraProbe>,
}

impl FakeCamera {
    pub fn new() -> (Self, Rc<FakeCameraProbe>) {
        let probe = Rc::new(FakeCameraProbe::default());
        (
            Self {
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl CameraDevice for FakeCamera {
    fn open(&mut self) -> Result<Box<dyn VideoStream>, CameraError> {
        if let Some(err) = self.probe.fail_open.borrow().clone() {
            return Err(err);
        }
        self.probe.opens.set(self.probe.opens.get() + 1);
        Ok(Box::new(FakeStream {
            probe: self.probe.clone(),
        }))
    }
}

struct FakeStream {
    probe: Rc<FakeCameraProbe>,
}

impl VideoStream for FakeStream {
    fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
        if self.probe.disconnected.get() {
            return Err(CaptureError::StreamEnded("device disconnected".to_string()));
        }
        self.probe.frames.set(self.probe.frames.get() + 1);
        Ok(RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])))
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        self.probe.releases.set(self.probe.releases.get() + 1);
    }
}
