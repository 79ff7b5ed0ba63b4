use std::rc::Rc;
use std::time::Duration;

use rodio::OutputStream;
use rodio::Source;
use rodio::source::SineWave;

use crate::notify::{SoundCue, SoundEffects};

/// Short synthesized blips mixed straight into the output stream.
pub struct RodioCues {
    stream: Rc<OutputStream>,
}

impl RodioCues {
    pub fn new(stream: Rc<OutputStream>) -> Self {
        Self { stream }
    }
}

impl SoundEffects for RodioCues {
    fn play(&mut self, cue: SoundCue) {
        let (freq, ms) = match cue {
            SoundCue::Click => (1_200.0, 30),
            SoundCue::Toggle => (660.0, 80),
        };
        let blip = SineWave::new(freq)
            .take_duration(Duration::from_millis(ms))
            .amplify(0.12);
        self.stream.mixer().add(blip);
    }
}
