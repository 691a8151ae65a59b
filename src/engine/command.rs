//! Encoder argument construction for the GPU and CPU strategies

use std::path::Path;

use crate::domain::model::*;
use crate::domain::rules::OutputNaming;

/// Audio treatment for a preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioHandling {
    /// Pass the audio stream through untouched
    Copy,
    /// Re-encode to AAC at the given bitrate
    Aac(&'static str),
}

impl AudioHandling {
    fn push_args(&self, args: &mut Vec<String>) {
        match self {
            AudioHandling::Copy => push(args, &["-c:a", "copy"]),
            AudioHandling::Aac(bitrate) => push(args, &["-c:a", "aac", "-b:a", bitrate]),
        }
    }
}

/// NVENC parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpuPreset {
    pub cq: u8,
    pub maxrate: &'static str,
    pub bufsize: &'static str,
    pub audio: AudioHandling,
}

/// x264 parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuPreset {
    pub speed: &'static str,
    pub crf: u8,
    pub audio: AudioHandling,
}

/// Bitrate-capped GPU output
pub const GPU_COMPRESS: GpuPreset = GpuPreset {
    cq: 28,
    maxrate: "10M",
    bufsize: "20M",
    audio: AudioHandling::Aac("96k"),
};

/// High-fidelity GPU output
pub const GPU_QUALITY: GpuPreset = GpuPreset {
    cq: 15,
    maxrate: "130M",
    bufsize: "260M",
    audio: AudioHandling::Copy,
};

pub const CPU_COMPRESS: CpuPreset = CpuPreset {
    speed: "medium",
    crf: 23,
    audio: AudioHandling::Aac("128k"),
};

pub const CPU_QUALITY: CpuPreset = CpuPreset {
    speed: "slow",
    crf: 18,
    audio: AudioHandling::Copy,
};

const GPU_ENCODER: &str = "h264_nvenc";
const CPU_ENCODER: &str = "libx264";
const GPU_THREADS: &str = "8";
const GPU_EXTRA_HW_FRAMES: &str = "3";

/// Builds encoder invocations; pure, same input always yields the same arguments
pub struct EncodeCommandBuilder;

impl EncodeCommandBuilder {
    /// Build the invocation for one job in the given mode
    pub fn build(job: &Job, mode: EncodeMode) -> EncodeInvocation {
        let output = OutputNaming::output_path(&job.input);
        let args = Self::build_args(&job.input, job.compress, job.trim.as_ref(), mode, &output);
        EncodeInvocation { mode, args, output }
    }

    /// Build the raw argument list
    pub fn build_args(
        input: &Path,
        compress: bool,
        trim: Option<&TrimRange>,
        mode: EncodeMode,
        output: &Path,
    ) -> Vec<String> {
        let mut args = vec!["-y".to_string()];

        if mode == EncodeMode::Gpu {
            push(
                &mut args,
                &[
                    "-hwaccel",
                    "cuda",
                    "-hwaccel_output_format",
                    "cuda",
                    "-extra_hw_frames",
                    GPU_EXTRA_HW_FRAMES,
                    "-threads",
                    GPU_THREADS,
                ],
            );
        }

        args.push("-i".to_string());
        args.push(input.to_string_lossy().into_owned());
        push(&mut args, &["-progress", "pipe:1", "-nostats"]);

        if let Some(trim) = trim {
            args.push("-ss".to_string());
            args.push(format_seconds(trim.start()));
            args.push("-t".to_string());
            args.push(format_seconds(trim.duration()));
        }

        match mode {
            EncodeMode::Gpu => {
                let preset = if compress { GPU_COMPRESS } else { GPU_QUALITY };
                let cq = preset.cq.to_string();
                push(
                    &mut args,
                    &[
                        "-c:v",
                        GPU_ENCODER,
                        "-preset",
                        "p2",
                        "-tune",
                        "hq",
                        "-cq",
                        &cq,
                        "-b:v",
                        "0",
                        "-maxrate",
                        preset.maxrate,
                        "-bufsize",
                        preset.bufsize,
                    ],
                );
                preset.audio.push_args(&mut args);
            }
            EncodeMode::Cpu => {
                let preset = if compress { CPU_COMPRESS } else { CPU_QUALITY };
                let crf = preset.crf.to_string();
                push(
                    &mut args,
                    &["-c:v", CPU_ENCODER, "-preset", preset.speed, "-crf", &crf],
                );
                preset.audio.push_args(&mut args);
            }
        }

        args.push(output.to_string_lossy().into_owned());
        args
    }
}

fn push(args: &mut Vec<String>, values: &[&str]) {
    args.extend(values.iter().map(|v| v.to_string()));
}

/// Seconds as ffmpeg accepts them, rounded to milliseconds and without trailing zeros
fn format_seconds(seconds: f64) -> String {
    let formatted = format!("{:.3}", seconds);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn job(compress: bool) -> Job {
        Job::new("/videos/holiday.mov", compress)
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_gpu_quality_invocation() {
        let invocation = EncodeCommandBuilder::build(&job(false), EncodeMode::Gpu);
        assert_eq!(invocation.output, PathBuf::from("/videos/holiday_processed.mp4"));
        assert_eq!(
            invocation.args,
            vec![
                "-y", "-hwaccel", "cuda", "-hwaccel_output_format", "cuda", "-extra_hw_frames",
                "3", "-threads", "8", "-i", "/videos/holiday.mov", "-progress", "pipe:1",
                "-nostats", "-c:v", "h264_nvenc", "-preset", "p2", "-tune", "hq", "-cq", "15",
                "-b:v", "0", "-maxrate", "130M", "-bufsize", "260M", "-c:a", "copy",
                "/videos/holiday_processed.mp4",
            ]
        );
    }

    #[test]
    fn test_cpu_compress_invocation() {
        let invocation = EncodeCommandBuilder::build(&job(true), EncodeMode::Cpu);
        assert_eq!(
            invocation.args,
            vec![
                "-y", "-i", "/videos/holiday.mov", "-progress", "pipe:1", "-nostats", "-c:v",
                "libx264", "-preset", "medium", "-crf", "23", "-c:a", "aac", "-b:a", "128k",
                "/videos/holiday_processed.mp4",
            ]
        );
    }

    #[test]
    fn test_cpu_mode_has_no_hardware_flags() {
        for compress in [true, false] {
            let args = EncodeCommandBuilder::build(&job(compress), EncodeMode::Cpu).args;
            assert!(!args.iter().any(|a| a.starts_with("-hwaccel")));
            assert!(!args.iter().any(|a| a == "h264_nvenc"));
        }
    }

    #[test]
    fn test_gpu_presets_differ_only_in_preset_fields() {
        let compressed = EncodeCommandBuilder::build(&job(true), EncodeMode::Gpu).args;
        let quality = EncodeCommandBuilder::build(&job(false), EncodeMode::Gpu).args;

        assert_eq!(value_after(&compressed, "-cq"), Some("28"));
        assert_eq!(value_after(&quality, "-cq"), Some("15"));
        assert_eq!(value_after(&compressed, "-maxrate"), Some("10M"));
        assert_eq!(value_after(&quality, "-maxrate"), Some("130M"));
        assert_eq!(value_after(&compressed, "-bufsize"), Some("20M"));
        assert_eq!(value_after(&quality, "-bufsize"), Some("260M"));
        assert_eq!(value_after(&compressed, "-c:a"), Some("aac"));
        assert_eq!(value_after(&quality, "-c:a"), Some("copy"));

        // Everything up to the codec options is shared
        let shared = compressed.iter().position(|a| a == "-cq").unwrap();
        assert_eq!(compressed[..shared], quality[..shared]);
        assert_eq!(compressed.last(), quality.last());
    }

    #[test]
    fn test_cpu_presets_differ_only_in_preset_fields() {
        let compressed = EncodeCommandBuilder::build(&job(true), EncodeMode::Cpu).args;
        let quality = EncodeCommandBuilder::build(&job(false), EncodeMode::Cpu).args;

        assert_eq!(value_after(&compressed, "-preset"), Some("medium"));
        assert_eq!(value_after(&quality, "-preset"), Some("slow"));
        assert_eq!(value_after(&compressed, "-crf"), Some("23"));
        assert_eq!(value_after(&quality, "-crf"), Some("18"));
        assert_eq!(value_after(&compressed, "-b:a"), Some("128k"));
        assert_eq!(value_after(&quality, "-b:a"), None);
    }

    #[test]
    fn test_build_is_stable() {
        let job = job(true).with_trim(TrimRange::new(1.5, 9.0).unwrap());
        for mode in [EncodeMode::Gpu, EncodeMode::Cpu] {
            assert_eq!(
                EncodeCommandBuilder::build(&job, mode),
                EncodeCommandBuilder::build(&job, mode)
            );
        }
    }

    #[test]
    fn test_trim_in_both_modes() {
        let job = job(false).with_trim(TrimRange::new(10.0, 40.0).unwrap());
        for mode in [EncodeMode::Gpu, EncodeMode::Cpu] {
            let args = EncodeCommandBuilder::build(&job, mode).args;
            assert_eq!(value_after(&args, "-ss"), Some("10"));
            assert_eq!(value_after(&args, "-t"), Some("30"));

            let ss = args.iter().position(|a| a == "-ss").unwrap();
            let progress = args.iter().position(|a| a == "-nostats").unwrap();
            let codec = args.iter().position(|a| a == "-c:v").unwrap();
            assert!(progress < ss && ss < codec);
        }
    }

    #[test]
    fn test_no_trim_flags_without_trim() {
        let args = EncodeCommandBuilder::build(&job(true), EncodeMode::Gpu).args;
        assert!(!args.iter().any(|a| a == "-ss" || a == "-t"));
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(10.0), "10");
        assert_eq!(format_seconds(7.5), "7.5");
        assert_eq!(format_seconds(0.125), "0.125");
        assert_eq!(format_seconds(0.0), "0");
        assert_eq!(format_seconds(10.0004), "10");
        assert_eq!(format_seconds(1.23456), "1.235");
    }
}
