use crate::{
    CoreResult, RecorderError,
    audio::{CaptureBackend, CaptureHandle},
};

use std::{
    fs::{self, File},
    io::BufWriter,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        {Arc, Mutex},
    },
    time::Duration,
};

use cpal::{
    Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{WavSpec, WavWriter};
use tracing::{debug, error, info, instrument};

/// Bit depth of the PCM samples written to recordings.
pub(crate) const BITS_PER_SAMPLE: u16 = 16;

type SharedWriter = Arc<Mutex<Option<WavWriter<BufWriter<File>>>>>;

/// Microphone capture through the default cpal input device.
///
/// The device is resolved on every [`CaptureBackend::open`] so the app can
/// start without a microphone and pick one up once it is plugged in.
pub struct CpalCapture {
    host: cpal::Host,
}

impl CpalCapture {
    /// Create a capture backend bound to the default audio host.
    #[instrument]
    pub fn new() -> Self {
        let host = cpal::default_host();
        debug!(host = ?host.id(), "CpalCapture initialized");
        Self { host }
    }

    #[track_caller]
    fn input_device(&self) -> CoreResult<(Device, cpal::SupportedStreamConfig)> {
        let device = self
            .host
            .default_input_device()
            .ok_or(RecorderError::NoMicrophoneFound {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_input_config()
            .map_err(|e| RecorderError::DeviceError {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok((device, config))
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for CpalCapture {
    type Handle = CpalCaptureHandle;

    #[track_caller]
    #[instrument(skip(self))]
    fn open(&mut self, output_path: &Path) -> CoreResult<Self::Handle> {
        let (device, supported) = self.input_device()?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate,
            channels = config.channels,
            sample_format = ?sample_format,
            "Input device acquired"
        );

        let spec = wav_spec(&config);
        let writer = WavWriter::create(output_path, spec).map_err(|e| {
            RecorderError::EncodingError {
                reason: format!("Failed to create {:?}: {}", output_path, e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let sink = SampleSink::new(writer);

        let stream = match build_stream(&device, &config, sample_format, &sink) {
            Ok(stream) => stream,
            Err(e) => {
                discard_partial_file(&sink, output_path);
                return Err(e);
            }
        };

        if let Err(e) = stream.play() {
            drop(stream);
            discard_partial_file(&sink, output_path);
            return Err(RecorderError::DeviceError {
                reason: format!("Failed to start stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(path = ?output_path, "Audio capture started");

        Ok(CpalCaptureHandle {
            stream,
            sink,
            output_path: output_path.to_path_buf(),
        })
    }
}

/// A running cpal input stream writing into a WAV file.
pub struct CpalCaptureHandle {
    stream: Stream,
    sink: SampleSink,
    output_path: PathBuf,
}

impl CaptureHandle for CpalCaptureHandle {
    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.output_path))]
    fn finish(self) -> CoreResult<()> {
        // The callback checks this flag before touching the writer, so no
        // samples land after the writer is taken below.
        self.sink.shut_down();
        drop(self.stream);
        std::thread::sleep(Duration::from_millis(5));
        info!("Audio capture stopped");

        if let Some(writer) = self.sink.take_writer() {
            writer
                .finalize()
                .map_err(|e| RecorderError::EncodingError {
                    reason: format!("Failed to finalize {:?}: {}", self.output_path, e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        if self.sink.write_failed.load(Ordering::Acquire) {
            return Err(RecorderError::EncodingError {
                reason: format!("Samples were dropped while writing {:?}", self.output_path),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(
            sample_count = self.sink.samples_written(),
            "Recording finalized"
        );

        Ok(())
    }
}

/// State shared between the audio callback and the capture handle.
#[derive(Clone)]
pub(crate) struct SampleSink {
    writer: SharedWriter,
    /// Set before the stream is dropped so a late callback never writes.
    shutdown: Arc<AtomicBool>,
    write_failed: Arc<AtomicBool>,
    samples_written: Arc<AtomicU64>,
}

impl SampleSink {
    pub(crate) fn new(writer: WavWriter<BufWriter<File>>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Some(writer))),
            shutdown: Arc::new(AtomicBool::new(false)),
            write_failed: Arc::new(AtomicBool::new(false)),
            samples_written: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn shut_down(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    pub(crate) fn samples_written(&self) -> u64 {
        self.samples_written.load(Ordering::Acquire)
    }

    /// Take the writer out so it can be finalized. `None` once taken.
    pub(crate) fn take_writer(&self) -> Option<WavWriter<BufWriter<File>>> {
        self.writer
            .lock()
            .unwrap_or_else(|e| {
                error!("Writer lock poisoned, recovering: {}", e);
                e.into_inner()
            })
            .take()
    }

    /// Convert `data` to 16-bit PCM and append it to the file.
    pub(crate) fn write<T>(&self, data: &[T])
    where
        T: SizedSample,
        i16: FromSample<T>,
    {
        if self.shutdown.load(Ordering::Acquire) || self.write_failed.load(Ordering::Acquire) {
            return;
        }

        let mut guard = self.writer.lock().unwrap_or_else(|e| {
            error!("Writer lock poisoned, recovering: {}", e);
            e.into_inner()
        });

        let Some(writer) = guard.as_mut() else {
            return;
        };

        for &sample in data {
            if let Err(e) = writer.write_sample(i16::from_sample(sample)) {
                error!(error = %e, "Failed to write sample, dropping remaining audio");
                self.write_failed.store(true, Ordering::Release);
                return;
            }
        }

        self.samples_written
            .fetch_add(data.len() as u64, Ordering::AcqRel);
    }
}

pub(crate) fn wav_spec(config: &StreamConfig) -> WavSpec {
    WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    }
}

#[track_caller]
fn build_stream(
    device: &Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    sink: &SampleSink,
) -> CoreResult<Stream> {
    match sample_format {
        SampleFormat::F32 => build_typed_stream::<f32>(device, config, sink),
        SampleFormat::F64 => build_typed_stream::<f64>(device, config, sink),
        SampleFormat::I8 => build_typed_stream::<i8>(device, config, sink),
        SampleFormat::I16 => build_typed_stream::<i16>(device, config, sink),
        SampleFormat::I32 => build_typed_stream::<i32>(device, config, sink),
        SampleFormat::U8 => build_typed_stream::<u8>(device, config, sink),
        SampleFormat::U16 => build_typed_stream::<u16>(device, config, sink),
        SampleFormat::U32 => build_typed_stream::<u32>(device, config, sink),
        other => Err(RecorderError::DeviceError {
            reason: format!("Unsupported sample format: {:?}", other),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

#[track_caller]
fn build_typed_stream<T>(
    device: &Device,
    config: &StreamConfig,
    sink: &SampleSink,
) -> CoreResult<Stream>
where
    T: SizedSample + Send + 'static,
    i16: FromSample<T>,
{
    let sink = sink.clone();

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| sink.write(data),
            |err| {
                error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| RecorderError::DeviceError {
            reason: format!("Failed to build stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}

fn discard_partial_file(sink: &SampleSink, output_path: &Path) {
    drop(sink.take_writer());

    if let Err(e) = fs::remove_file(output_path) {
        error!(path = ?output_path, error = %e, "Failed to remove partial recording");
    }
}
