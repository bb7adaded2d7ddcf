use crate::media::MediaControl;
use crate::mpris::MprisHandle;
use crate::session::SessionController;

/// Push the controller's current track and phase out to MPRIS.
pub fn update_mpris<M: MediaControl>(mpris: &MprisHandle, controller: &SessionController<M>) {
    mpris.set_track_metadata(controller.active_track());
    mpris.set_playback(controller.state().phase);
}
