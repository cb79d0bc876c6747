use bytemuck::{Pod, Zeroable};

use crate::error::{ZmapError, ZmapResult};

/// One pixel of a height pass, laid out as the rasterizer writes it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct HeightSample {
    /// Height within the pass, 0..=255 spanning one `z_step`.
    pub height: u8,
    pub room_id: u8,
    pub reserved: [u8; 2],
}

impl HeightSample {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub const fn new(height: u8, room_id: u8) -> Self {
        Self {
            height,
            room_id,
            reserved: [0; 2],
        }
    }
}

/// Source of rasterized height passes, one sample per grid cell in row-major
/// order (`y * x_res + x`).
///
/// Each pass covers heights `frame_z - z_step ..= frame_z`.
pub trait HeightPassProducer {
    fn capture(&mut self, frame_z: f32, z_step: f32) -> Vec<u8>;
}

impl<F> HeightPassProducer for F
where
    F: FnMut(f32, f32) -> Vec<u8>,
{
    fn capture(&mut self, frame_z: f32, z_step: f32) -> Vec<u8> {
        self(frame_z, z_step)
    }
}

/// Views a raw feed as samples without copying.
pub fn decode_samples(feed: &[u8]) -> ZmapResult<&[HeightSample]> {
    bytemuck::try_cast_slice(feed).map_err(|_| ZmapError::MisalignedFeed { len: feed.len() })
}

/// Packs samples back into a feed, the producer side of [`decode_samples`].
pub fn encode_samples(samples: &[HeightSample]) -> Vec<u8> {
    bytemuck::cast_slice(samples).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_decodes_in_place() {
        let feed = [10u8, 1, 0, 0, 200, 2, 0, 0];
        let samples = decode_samples(&feed).unwrap();
        assert_eq!(samples, &[HeightSample::new(10, 1), HeightSample::new(200, 2)]);
    }

    #[test]
    fn ragged_feed_is_rejected() {
        assert_eq!(
            decode_samples(&[1, 2, 3]).unwrap_err(),
            ZmapError::MisalignedFeed { len: 3 }
        );
    }

    #[test]
    fn closures_are_producers() {
        let mut calls = 0;
        let mut producer = |_: f32, _: f32| {
            calls += 1;
            encode_samples(&[HeightSample::new(255, 1)])
        };
        assert_eq!(producer.capture(1.0, 1.0), vec![255, 1, 0, 0]);
        drop(producer);
        assert_eq!(calls, 1);
    }
}
