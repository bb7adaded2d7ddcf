use crate::config::Settings;
use crate::media::MediaControl;
use crate::session::SessionController;

/// Rehydrate the session from persisted state: reload the last listened
/// track paused, ready to resume where the listener left off.
pub fn rehydrate<M: MediaControl>(controller: &mut SessionController<M>, settings: &Settings) {
    if settings.playback.resume_last {
        controller.resume_last();
    }
}
