use crate::model::melody::Melody;
use anyhow::{Result, anyhow, bail};
use log::{debug, warn};
use midly::num::{u4, u7, u15, u24, u28};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::fs;
use std::path::Path;

pub const TICKS_PER_QUARTER: u16 = 480;
pub const DEFAULT_TEMPO_BPM: u32 = 60;

const VELOCITY: u8 = 127;
const MICROSECONDS_PER_MINUTE: u32 = 60_000_000;
const MAX_MIDI_NOTE: i32 = 127;
const MAX_MPQN: u32 = (1 << 24) - 1;
const MAX_DELTA_TICKS: u32 = (1 << 28) - 1;

struct TimedMessage {
    tick: u32,
    is_start: bool,
    key: u8,
}

/// Write `melody` as a single-track Standard MIDI File.
pub fn write_midi<P: AsRef<Path>>(melody: &Melody, path: P, tempo_bpm: u32) -> Result<()> {
    let smf = melody_to_smf(melody, tempo_bpm)?;

    let mut bytes = Vec::new();
    smf.write(&mut bytes)
        .map_err(|e| anyhow!("Failed to encode MIDI: {:?}", e))?;

    fs::write(path.as_ref(), &bytes).map_err(|e| {
        anyhow!(
            "Failed to write MIDI file {}: {}",
            path.as_ref().display(),
            e
        )
    })?;

    debug!(
        "Wrote {} bytes to '{}'..!",
        bytes.len(),
        path.as_ref().display()
    );

    Ok(())
}

/// Lay the melody out on a timeline and convert it to an in-memory SMF.
///
/// Every note of a group starts on the group's time point, and the next group starts once the
/// group's longest note has ended. Pitches outside the MIDI range are dropped.
pub fn melody_to_smf(melody: &Melody, tempo_bpm: u32) -> Result<Smf<'static>> {
    if tempo_bpm == 0 {
        bail!("Tempo must be greater than 0 bpm..!");
    }

    let mpqn = MICROSECONDS_PER_MINUTE / tempo_bpm;
    if mpqn > MAX_MPQN {
        bail!("Tempo of {} bpm is too slow to encode..!", tempo_bpm);
    }

    let mut messages: Vec<TimedMessage> = Vec::new();
    let mut group_start = 0.0;

    for group in melody.groups() {
        for note in group.notes() {
            if !(0..=MAX_MIDI_NOTE).contains(&note.pitch()) {
                warn!(
                    "Dropping out-of-range pitch {} at beat {}..!",
                    note.pitch(),
                    group_start
                );
                continue;
            }

            let key = note.pitch() as u8;
            messages.push(TimedMessage {
                tick: beats_to_ticks(group_start)?,
                is_start: true,
                key,
            });
            messages.push(TimedMessage {
                tick: beats_to_ticks(group_start + note.duration())?,
                is_start: false,
                key,
            });
        }

        group_start += group.span();
    }

    // Note-offs sort ahead of note-ons on the same tick so repeated pitches retrigger cleanly.
    messages.sort_by_key(|msg| (msg.tick, msg.is_start));

    let mut track: Vec<TrackEvent<'static>> = Vec::with_capacity(messages.len() + 2);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(mpqn))),
    });

    let channel = u4::new(0);
    let mut last_tick = 0;
    for msg in messages {
        let message = if msg.is_start {
            MidiMessage::NoteOn {
                key: u7::new(msg.key),
                vel: u7::new(VELOCITY),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(msg.key),
                vel: u7::new(0),
            }
        };

        let delta = msg.tick - last_tick;
        if delta > MAX_DELTA_TICKS {
            bail!(
                "Gap of {} ticks before tick {} is too long to encode..!",
                delta,
                msg.tick
            );
        }

        track.push(TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = msg.tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));
    smf.tracks.push(track);

    Ok(smf)
}

fn beats_to_ticks(beats: f64) -> Result<u32> {
    let ticks = (beats * TICKS_PER_QUARTER as f64).round();
    if !(0.0..=u32::MAX as f64).contains(&ticks) {
        bail!("Beat {} is too late to encode..!", beats);
    }

    Ok(ticks as u32)
}
