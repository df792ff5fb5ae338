use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::page::{AudioOutput, Page, Target};

/// Optional click sounds. Audio is only opened after the visitor has
/// clicked somewhere, and a page that cannot open it stays silent.
pub struct SoundEffects<P: Page> {
    page: Rc<P>,
    output: RefCell<Option<P::Audio>>,
}

impl<P: Page + 'static> SoundEffects<P> {
    pub fn new(page: Rc<P>) -> Rc<Self> {
        Rc::new(Self { page, output: RefCell::new(None) })
    }

    pub fn init(self: &Rc<Self>) -> Result<()> {
        let sound = Rc::downgrade(self);
        self.page.listen(
            Target::Document,
            "click",
            Box::new(move |_| {
                if let Some(sound) = sound.upgrade() {
                    sound.activate();
                }
            }),
        )
    }

    pub fn activate(&self) {
        if self.is_active() {
            return;
        }
        match self.page.open_audio() {
            Ok(output) => {
                *self.output.borrow_mut() = Some(output);
                log::info!("Audio enabled");
            }
            Err(err) => log::warn!("Audio not supported in this browser: {}", err),
        }
    }

    pub fn is_active(&self) -> bool {
        self.output.borrow().is_some()
    }

    /// Play a short tone. Silently does nothing while audio is off.
    pub fn play_tone(&self, frequency: f32, duration: f64) {
        let output = self.output.borrow();
        let Some(output) = output.as_ref() else {
            return;
        };
        if let Err(err) = output.tone(frequency, duration) {
            log::warn!("Could not play tone: {}", err);
        }
    }
}
