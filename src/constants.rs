use std::time::Duration;

pub const SLIDE_DURATION: Duration = Duration::from_millis(10_000);  // Deadline for each slide (D)
pub const FINISH_TOLERANCE: Duration = Duration::from_millis(100);   // Position within this of the end counts as finished
pub const STATUS_INTERVAL: Duration = Duration::from_millis(250);    // Playback status update period
pub const SLIDE_SLOTS: usize = 5;                                    // Fixed slots in the hero slider record

pub const RENDER_WIDTH: i32 = 540;            // Width of the viewer window
pub const RENDER_HEIGHT: i32 = 960;           // Height of the viewer window (portrait, stories format)
pub const FPS: u32 = 60;                      // Frames per second
pub const PROGRESS_BAR_WIDTH: i32 = 60;       // Width of a single progress bar
pub const PROGRESS_BAR_HEIGHT: i32 = 3;       // Height of a single progress bar
pub const PROGRESS_BAR_GAP: i32 = 8;          // Horizontal gap between progress bars
