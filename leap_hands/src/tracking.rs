//! Tracking sources — LeapMotion hardware and a synthetic hand.
//!
//! The public interface is [`TrackingSource::frame`], polled once per loop
//! iteration. Consumers don't need to know whether the bones came from real
//! hardware, the simulator, or a scripted test fixture.

use std::collections::VecDeque;

use bone_grid::{Point, Projector, Vec3};

use crate::error::TrackingError;

// ════════════════════════════════════════════════════════════════════════════
// Frame data
// ════════════════════════════════════════════════════════════════════════════

/// One finger bone as reported by the device, in sensor space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bone {
    pub prev_joint: Vec3,
    pub center:     Vec3,
    pub next_joint: Vec3,
    pub is_valid:   bool,
}

impl Bone {
    /// A valid bone between two joints, centred halfway.
    pub fn between(prev_joint: Vec3, next_joint: Vec3) -> Self {
        Bone {
            prev_joint,
            center: Vec3::midpoint(prev_joint, next_joint),
            next_joint,
            is_valid: true,
        }
    }

    fn is_drawable(&self) -> bool {
        self.is_valid
            && self.prev_joint.is_finite()
            && self.center.is_finite()
            && self.next_joint.is_finite()
    }
}

/// A snapshot of every bone in view. Empty when no hands are tracked.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub bones: Vec<Bone>,
}

impl Frame {
    pub fn empty() -> Self { Frame::default() }

    pub fn new(bones: Vec<Bone>) -> Self { Frame { bones } }

    pub fn is_empty(&self) -> bool { self.bones.is_empty() }

    /// Project every drawable bone to a 2D [`BoneSegment`].
    ///
    /// Bones flagged invalid, or with a non-finite joint, are dropped here so
    /// they never reach the mapper.
    pub fn segments(&self, projector: &Projector) -> Vec<BoneSegment> {
        self.bones
            .iter()
            .filter(|b| b.is_drawable())
            .map(|b| BoneSegment {
                start: projector.project(b.prev_joint),
                mid:   projector.project(b.center),
                end:   projector.project(b.next_joint),
            })
            .collect()
    }
}

/// A projected bone: start, middle and end points in the 2D sensor plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneSegment {
    pub start: Point,
    pub mid:   Point,
    pub end:   Point,
}

impl BoneSegment {
    pub fn points(&self) -> [Point; 3] {
        [self.start, self.mid, self.end]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackingSource trait — unified interface for hw, sim and scripts
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can be asked for the current [`Frame`].
pub trait TrackingSource {
    fn frame(&mut self) -> Result<Frame, TrackingError>;
}

// ════════════════════════════════════════════════════════════════════════════
// LeapTrackingSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Tracking source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Each call empties LeapC's message queue: the first poll waits up to
/// `POLL_TIMEOUT_MS`, the rest do not wait, and the newest tracking event
/// replaces the held frame. Older queued frames are dropped so the view never
/// trails the hand. The connection is closed when the source is dropped.
#[cfg(feature = "leap")]
pub struct LeapTrackingSource {
    connection:    leaprs::Connection,
    latest:        Frame,
    poll_failures: u32,
}

#[cfg(feature = "leap")]
impl LeapTrackingSource {
    const POLL_TIMEOUT_MS:   u32 = 100;
    const MAX_POLL_FAILURES: u32 = 50;
    const MAX_DRAIN:         usize = 256;

    pub fn connect() -> Result<Self, TrackingError> {
        use leaprs::{Connection, ConnectionConfig};

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| TrackingError::Connect(format!("{:?}", e)))?;
        connection
            .open()
            .map_err(|e| TrackingError::Connect(format!("{:?}", e)))?;
        tracing::info!("LeapC connection opened");

        Ok(LeapTrackingSource {
            connection,
            latest: Frame::empty(),
            poll_failures: 0,
        })
    }
}

#[cfg(feature = "leap")]
impl TrackingSource for LeapTrackingSource {
    fn frame(&mut self) -> Result<Frame, TrackingError> {
        use leaprs::Event;

        let connection = &mut self.connection;
        let (newest, received, error) = drain_newest(Self::MAX_DRAIN, |first| {
            let timeout = if first { Self::POLL_TIMEOUT_MS } else { 0 };
            connection.poll(timeout).map(|msg| match msg.event() {
                Event::Tracking(tracking) => {
                    let mut bones = Vec::new();
                    for hand in tracking.hands() {
                        for digit in hand.digits() {
                            for bone in [
                                digit.metacarpal(),
                                digit.proximal(),
                                digit.intermediate(),
                                digit.distal(),
                            ] {
                                let prev = bone.prev_joint();
                                let next = bone.next_joint();
                                bones.push(Bone::between(
                                    Vec3::new(prev.x.into(), prev.y.into(), prev.z.into()),
                                    Vec3::new(next.x.into(), next.y.into(), next.z.into()),
                                ));
                            }
                        }
                    }
                    Some(Frame::new(bones))
                }
                _ => None,
            })
        });

        if let Some(frame) = newest {
            self.latest = frame;
        }
        if received > 0 {
            self.poll_failures = 0;
            tracing::trace!(received, "drained LeapC queue");
        } else if let Some(e) = error {
            self.poll_failures += 1;
            tracing::debug!(failures = self.poll_failures, "LeapC poll: {:?}", e);
            if self.poll_failures >= Self::MAX_POLL_FAILURES {
                self.poll_failures = 0;
                self.latest = Frame::empty();
                return Err(TrackingError::Poll(format!("{:?}", e)));
            }
        }
        Ok(self.latest.clone())
    }
}

/// Pull messages from `next` until it errors (an empty queue reports a
/// timeout) or `limit` messages have been taken, keeping only the newest
/// frame. `next` is told whether it is making the first pull.
///
/// Returns the newest frame, the number of messages taken, and the error
/// that stopped the drain.
#[cfg_attr(not(feature = "leap"), allow(dead_code))]
fn drain_newest<F, E>(
    limit: usize,
    mut next: impl FnMut(bool) -> Result<Option<F>, E>,
) -> (Option<F>, usize, Option<E>) {
    let mut newest = None;
    for taken in 0..limit {
        match next(taken == 0) {
            Ok(Some(frame)) => newest = Some(frame),
            Ok(None)        => {}
            Err(e)          => return (newest, taken, Some(e)),
        }
    }
    (newest, limit, None)
}

// ════════════════════════════════════════════════════════════════════════════
// SimTrackingSource — synthetic hand (always available)
// ════════════════════════════════════════════════════════════════════════════

/// A fake right hand that drifts around the space above the device.
///
/// Five fingers of four bones each, in LeapMotion-like millimetres. The hand
/// is in view for `visible_frames` calls, then out of view for
/// `absent_frames`, repeating; fully deterministic in the call count.
#[derive(Clone, Debug)]
pub struct SimTrackingSource {
    pub visible_frames: u64,
    pub absent_frames:  u64,
    tick:               u64,
}

/// Metacarpal, proximal, intermediate, distal — thumb first.
const BONE_LENGTHS: [[f64; 4]; 5] = [
    [ 0.0, 40.0, 30.0, 22.0],
    [68.0, 40.0, 23.0, 17.0],
    [64.0, 44.0, 26.0, 18.0],
    [60.0, 41.0, 25.0, 18.0],
    [55.0, 33.0, 18.0, 16.0],
];

impl SimTrackingSource {
    pub fn new(visible_frames: u64, absent_frames: u64) -> Self {
        SimTrackingSource { visible_frames, absent_frames, tick: 0 }
    }

    fn hand_at(t: f64) -> Frame {
        let palm = Vec3::new(
            120.0 * (t * 0.7).sin(),
            200.0 +  40.0 * (t * 1.3).sin(),
             60.0 * (t * 0.5).cos(),
        );
        let curl = 0.25 + 0.2 * (t * 2.1).sin();

        let mut bones = Vec::with_capacity(20);
        for (finger, lengths) in BONE_LENGTHS.iter().enumerate() {
            let spread = (finger as f64 - 2.0) * 0.18;
            let mut joint = Vec3::new(palm.x + (finger as f64 - 2.0) * 18.0, palm.y, palm.z + 30.0);
            for (i, len) in lengths.iter().enumerate() {
                let droop = curl * i as f64;
                let next = Vec3::new(
                    joint.x + len * spread.sin(),
                    joint.y - len * droop.sin(),
                    joint.z - len * spread.cos() * droop.cos(),
                );
                bones.push(Bone::between(joint, next));
                joint = next;
            }
        }
        Frame::new(bones)
    }
}

impl Default for SimTrackingSource {
    fn default() -> Self { SimTrackingSource::new(300, 30) }
}

impl TrackingSource for SimTrackingSource {
    fn frame(&mut self) -> Result<Frame, TrackingError> {
        let cycle = (self.visible_frames + self.absent_frames).max(1);
        let phase = self.tick % cycle;
        let t = self.tick as f64 * 0.05;
        self.tick += 1;

        if phase >= self.visible_frames {
            return Ok(Frame::empty());
        }
        Ok(Self::hand_at(t))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedSource — fixed frame list (tests, headless runs)
// ════════════════════════════════════════════════════════════════════════════

/// Replays the given frames in order, then reports empty frames forever.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<Frame>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        ScriptedSource { frames: frames.into_iter().collect() }
    }
}

impl TrackingSource for ScriptedSource {
    fn frame(&mut self) -> Result<Frame, TrackingError> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
