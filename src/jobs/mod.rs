// Background job runners. Currently just the user-events worker that
// drains the intake queue.

pub mod events_worker;

pub use events_worker::UserEventsWorker;
