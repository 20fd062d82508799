//! AudioHandle: main-thread interface to the output stream.
//!
//! A dedicated thread opens the cpal output device and owns the stream for
//! its whole life. Commands travel over a crossbeam channel straight into the
//! stream callback, which drains them before filling each buffer.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{Receiver as CrossbeamReceiver, Sender as CrossbeamSender};

use super::commands::{AudioCmd, AudioFeedback};
use super::synth::SynthEngine;

/// Read-only view of the output device, updated from feedback.
#[derive(Debug, Clone, Default)]
pub struct AudioReadState {
    pub device_name: Option<String>,
    pub sample_rate: Option<u32>,
    pub last_error: Option<String>,
}

/// Main-thread handle to the audio subsystem.
pub struct AudioHandle {
    cmd_tx: Option<CrossbeamSender<AudioCmd>>,
    feedback_rx: Option<Receiver<AudioFeedback>>,
    /// Dropping this sender tells the audio thread to close the stream.
    shutdown_tx: Option<Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
    audio_state: AudioReadState,
    is_running: bool,
}

impl AudioHandle {
    /// Spawn the audio thread and open the default output device.
    pub fn new(master_gain: f32) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (feedback_tx, feedback_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join_handle = thread::Builder::new()
            .name("keyscribe-audio".to_string())
            .spawn(move || run_output(cmd_rx, feedback_tx, shutdown_rx, master_gain));

        let join_handle = match join_handle {
            Ok(h) => Some(h),
            Err(e) => {
                log::error!(target: "audio", "failed to spawn audio thread: {}", e);
                None
            }
        };

        Self {
            cmd_tx: Some(cmd_tx),
            feedback_rx: Some(feedback_rx),
            shutdown_tx: Some(shutdown_tx),
            join_handle,
            audio_state: AudioReadState::default(),
            is_running: false,
        }
    }

    /// A handle that never opens a device; every command is dropped.
    pub fn disabled() -> Self {
        Self {
            cmd_tx: None,
            feedback_rx: None,
            shutdown_tx: None,
            join_handle: None,
            audio_state: AudioReadState::default(),
            is_running: false,
        }
    }

    pub fn send_cmd(&self, cmd: AudioCmd) -> Result<(), String> {
        let tx = self
            .cmd_tx
            .as_ref()
            .ok_or_else(|| "Audio disabled".to_string())?;
        tx.send(cmd)
            .map_err(|_| "Audio thread disconnected".to_string())
    }

    /// Fire-and-forget. Commands sent while the device is still opening
    /// queue on the channel and play once the stream starts.
    fn send(&self, cmd: AudioCmd) {
        if self.cmd_tx.is_none() {
            return;
        }
        if let Err(e) = self.send_cmd(cmd) {
            log::warn!(target: "audio", "command dropped: {}", e);
        }
    }

    pub fn stop_all(&self) {
        self.send(AudioCmd::StopAll);
    }

    pub fn apply(&self, cmds: &[AudioCmd]) {
        for cmd in cmds {
            self.send(*cmd);
        }
    }

    pub fn drain_feedback(&mut self) -> Vec<AudioFeedback> {
        let mut out = Vec::new();
        let mut disconnected = false;
        if let Some(ref rx) = self.feedback_rx {
            loop {
                match rx.try_recv() {
                    Ok(msg) => out.push(msg),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }
        for msg in &out {
            self.apply_feedback(msg);
        }
        if disconnected {
            // The audio thread has exited and taken the stream with it
            log::warn!(target: "audio", "audio thread stopped");
            self.feedback_rx = None;
            self.cmd_tx = None;
            self.is_running = false;
        }
        out
    }

    fn apply_feedback(&mut self, feedback: &AudioFeedback) {
        match feedback {
            AudioFeedback::Started {
                device,
                sample_rate,
            } => {
                self.audio_state.device_name = Some(device.clone());
                self.audio_state.sample_rate = Some(*sample_rate);
                self.is_running = true;
            }
            AudioFeedback::Unavailable(reason) => {
                self.audio_state.last_error = Some(reason.clone());
                self.is_running = false;
            }
            AudioFeedback::StreamError(err) => {
                self.audio_state.last_error = Some(err.clone());
                self.is_running = false;
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn read_state(&self) -> &AudioReadState {
        &self.audio_state
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        self.shutdown_tx.take();
        self.cmd_tx.take();
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_output(
    cmd_rx: CrossbeamReceiver<AudioCmd>,
    feedback_tx: Sender<AudioFeedback>,
    shutdown_rx: Receiver<()>,
    master_gain: f32,
) {
    let stream = match open_output(cmd_rx, feedback_tx.clone(), master_gain) {
        Ok((stream, device, sample_rate)) => {
            log::info!(target: "audio", "output started on {} at {} Hz", device, sample_rate);
            let _ = feedback_tx.send(AudioFeedback::Started {
                device,
                sample_rate,
            });
            stream
        }
        Err(e) => {
            log::warn!(target: "audio", "audio output unavailable: {}", e);
            let _ = feedback_tx.send(AudioFeedback::Unavailable(e));
            return;
        }
    };

    // Block until the handle is dropped
    let _ = shutdown_rx.recv();
    drop(stream);
    log::debug!(target: "audio", "output stream closed");
}

fn open_output(
    cmd_rx: CrossbeamReceiver<AudioCmd>,
    feedback_tx: Sender<AudioFeedback>,
    master_gain: f32,
) -> Result<(Stream, String, u32), String> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| "No output device available".to_string())?;
    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

    let config = device
        .default_output_config()
        .map_err(|e| format!("Failed to get output config: {}", e))?;
    let sample_format = config.sample_format();
    let sample_rate = config.sample_rate().0;
    let stream_config: StreamConfig = config.into();

    let engine = SynthEngine::new(sample_rate as f32, master_gain);
    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, engine, cmd_rx, feedback_tx),
        SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, engine, cmd_rx, feedback_tx),
        SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, engine, cmd_rx, feedback_tx),
        other => Err(format!("Unsupported sample format: {:?}", other)),
    }?;

    stream
        .play()
        .map_err(|e| format!("Failed to start output stream: {}", e))?;

    Ok((stream, device_name, sample_rate))
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    mut engine: SynthEngine,
    cmd_rx: CrossbeamReceiver<AudioCmd>,
    feedback_tx: Sender<AudioFeedback>,
) -> Result<Stream, String>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels.max(1) as usize;
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                while let Ok(cmd) = cmd_rx.try_recv() {
                    engine.apply(cmd);
                }
                for frame in data.chunks_mut(channels) {
                    let value = T::from_sample(engine.next_sample());
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            move |err| {
                log::error!(target: "audio", "output stream error: {}", err);
                let _ = feedback_tx.send(AudioFeedback::StreamError(err.to_string()));
            },
            None,
        )
        .map_err(|e| format!("Failed to build output stream: {}", e))
}
