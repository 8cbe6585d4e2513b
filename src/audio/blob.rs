//! Finalized recordings.
//!
//! An [`AudioBlob`] holds exactly the bytes captured during one take: the
//! concatenation of every [`AudioChunk`] in arrival order, 16-bit
//! little-endian interleaved PCM.  The RIFF/WAVE container is added only
//! when the blob is uploaded ([`AudioBlob::to_wav`]).

use super::capture::AudioChunk;

// ---------------------------------------------------------------------------
// AudioFormat
// ---------------------------------------------------------------------------

/// Shape of the PCM data delivered by a capture stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Sample rate in Hz (e.g. 44100, 48000).
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl AudioFormat {
    /// Every sample is a signed 16-bit integer.
    pub const BYTES_PER_SAMPLE: u16 = 2;

    pub fn block_align(&self) -> u16 {
        self.channels * Self::BYTES_PER_SAMPLE
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }

    /// Seconds of audio represented by `len` bytes.
    pub fn duration_secs(&self, len: usize) -> f32 {
        let rate = self.byte_rate();
        if rate == 0 {
            return 0.0;
        }
        len as f32 / rate as f32
    }
}

// ---------------------------------------------------------------------------
// AudioBlob
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlob {
    format: AudioFormat,
    bytes: Vec<u8>,
}

impl AudioBlob {
    /// Media type of the uploaded file.
    pub const MEDIA_TYPE: &'static str = "audio/wav";
    /// File name of the uploaded file.
    pub const FILE_NAME: &'static str = "recording.wav";

    const WAV_HEADER_LEN: usize = 44;

    pub fn new(format: AudioFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    /// Concatenate chunks in the order given.
    pub fn from_chunks(format: AudioFormat, chunks: Vec<AudioChunk>) -> Self {
        let total = chunks.iter().map(AudioChunk::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for chunk in chunks {
            bytes.extend_from_slice(chunk.bytes());
        }
        Self { format, bytes }
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.format.duration_secs(self.bytes.len())
    }

    /// RIFF chunk size and data chunk size for a payload of `len` bytes.
    ///
    /// Both fields are 32-bit; payloads past the limit are clamped so the
    /// header stays well-formed.
    fn wav_sizes(len: usize) -> (u32, u32) {
        let data_len = u32::try_from(len).unwrap_or(u32::MAX - 36).min(u32::MAX - 36);
        (data_len + 36, data_len)
    }

    /// Wrap the PCM payload in a canonical 44-byte RIFF/WAVE header.
    pub fn to_wav(&self) -> Vec<u8> {
        let (riff_len, data_len) = Self::wav_sizes(self.bytes.len());
        let mut out = Vec::with_capacity(Self::WAV_HEADER_LEN + self.bytes.len());

        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&riff_len.to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&self.format.channels.to_le_bytes());
        out.extend_from_slice(&self.format.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.format.byte_rate().to_le_bytes());
        out.extend_from_slice(&self.format.block_align().to_le_bytes());
        out.extend_from_slice(&(AudioFormat::BYTES_PER_SAMPLE * 8).to_le_bytes());

        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.extend_from_slice(&self.bytes);
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const STEREO_48K: AudioFormat = AudioFormat {
        sample_rate: 48_000,
        channels: 2,
    };

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn chunks_concatenate_in_order() {
        let chunks = vec![
            AudioChunk::new(vec![1, 2]),
            AudioChunk::new(vec![3]),
            AudioChunk::new(vec![4, 5, 6]),
        ];
        let blob = AudioBlob::from_chunks(STEREO_48K, chunks);
        assert_eq!(blob.bytes(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(blob.len(), 6);
    }

    #[test]
    fn empty_take_is_empty_blob() {
        let blob = AudioBlob::from_chunks(STEREO_48K, Vec::new());
        assert!(blob.is_empty());
        assert_eq!(blob.to_wav().len(), 44);
    }

    #[test]
    fn wav_header_fields() {
        let blob = AudioBlob::new(STEREO_48K, vec![0u8; 400]);
        let wav = blob.to_wav();

        assert_eq!(wav.len(), 444);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 436);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u16_at(&wav, 20), 1);
        assert_eq!(u16_at(&wav, 22), 2);
        assert_eq!(u32_at(&wav, 24), 48_000);
        assert_eq!(u32_at(&wav, 28), 192_000);
        assert_eq!(u16_at(&wav, 32), 4);
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 400);
    }

    #[test]
    fn duration_from_byte_count() {
        let mono_16k = AudioFormat {
            sample_rate: 16_000,
            channels: 1,
        };
        // 16 000 samples * 2 bytes = one second
        let blob = AudioBlob::new(mono_16k, vec![0u8; 32_000]);
        assert!((blob.duration_secs() - 1.0).abs() < 1e-6);

        let silent = AudioFormat {
            sample_rate: 0,
            channels: 1,
        };
        assert_eq!(silent.duration_secs(100), 0.0);
    }

    #[test]
    fn oversized_payload_sizes_are_clamped() {
        assert_eq!(AudioBlob::wav_sizes(800), (836, 800));
        assert_eq!(
            AudioBlob::wav_sizes(u32::MAX as usize - 36),
            (u32::MAX, u32::MAX - 36)
        );
        assert_eq!(
            AudioBlob::wav_sizes(u32::MAX as usize),
            (u32::MAX, u32::MAX - 36)
        );
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            AudioBlob::wav_sizes(u32::MAX as usize * 2),
            (u32::MAX, u32::MAX - 36)
        );
    }
}
