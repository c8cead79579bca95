use std::time::Duration;

use tracing::{debug, info};

use crate::config::FormConfig;
use crate::surface::{selectors, ElementId, Surface};
use crate::timer::{TimerId, TimerQueue};
use crate::Result;

const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Message];

    pub fn selector(&self) -> &'static str {
        match self {
            Self::Name => selectors::FIELD_NAME,
            Self::Email => selectors::FIELD_EMAIL,
            Self::Message => selectors::FIELD_MESSAGE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Message => "Message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The page has no contact form
    NoForm,
    /// A submission is already in flight
    Busy,
    /// Required fields are empty; show this error
    Invalid(String),
    /// Submission accepted; completes after the submit delay
    Pending,
}

/// Contact form with client-side validation and a simulated send
#[derive(Debug)]
pub struct ContactForm {
    form: Option<ElementId>,
    fields: [Option<ElementId>; 3],
    button: Option<ElementId>,
    idle_label: String,
    sending_label: String,
    submit_delay: Duration,
    pending: Option<(TimerId, String)>,
}

impl ContactForm {
    pub fn new(surface: &dyn Surface, config: &FormConfig) -> Result<Self> {
        let form = surface.query_one(selectors::CONTACT_FORM)?;
        let mut fields = [None; 3];
        for (slot, field) in fields.iter_mut().zip(FormField::ALL) {
            *slot = surface.query_one(field.selector())?;
        }
        let button = surface.query_one(selectors::SUBMIT_BUTTON)?;
        let idle_label = match button {
            Some(id) => surface.text(id)?,
            None => String::new(),
        };
        Ok(Self {
            form,
            fields,
            button,
            idle_label,
            sending_label: config.sending_label.clone(),
            submit_delay: Duration::from_millis(config.submit_delay_ms),
            pending: None,
        })
    }

    pub fn exists(&self) -> bool {
        self.form.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn field(&self, field: FormField) -> Option<ElementId> {
        let index = FormField::ALL.iter().position(|f| *f == field)?;
        self.fields[index]
    }

    pub fn fill(&self, surface: &mut dyn Surface, field: FormField, value: &str) -> Result<()> {
        match self.field(field) {
            Some(id) => surface.set_value(id, value),
            None => Ok(()),
        }
    }

    pub fn value(&self, surface: &dyn Surface, field: FormField) -> Result<String> {
        match self.field(field) {
            Some(id) => surface.value(id),
            None => Ok(String::new()),
        }
    }

    /// Validate and start a simulated submission
    ///
    /// `task` is the queue item that should call [`ContactForm::complete`].
    pub fn submit<T: Clone>(
        &mut self,
        surface: &mut dyn Surface,
        queue: &mut TimerQueue<T>,
        task: T,
    ) -> Result<SubmitOutcome> {
        if self.form.is_none() {
            return Ok(SubmitOutcome::NoForm);
        }
        if self.pending.is_some() {
            return Ok(SubmitOutcome::Busy);
        }

        // Read everything before touching the button so a failed read leaves it idle
        let mut values = Vec::with_capacity(FormField::ALL.len());
        for field in FormField::ALL {
            values.push(self.value(surface, field)?);
        }
        if values.iter().any(|v| v.trim().is_empty()) {
            debug!("Contact form rejected: empty required field");
            return Ok(SubmitOutcome::Invalid(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        self.set_busy(surface, true)?;
        let name = values.swap_remove(0);
        let id = queue.set_timeout(self.submit_delay, task);
        self.pending = Some((id, name));
        info!("Contact form submitted");
        Ok(SubmitOutcome::Pending)
    }

    /// Finish the in-flight submission; returns the confirmation to show
    pub fn complete(&mut self, surface: &mut dyn Surface) -> Result<Option<String>> {
        let Some((_, name)) = self.pending.take() else {
            return Ok(None);
        };
        for field in FormField::ALL {
            self.fill(surface, field, "")?;
        }
        self.set_busy(surface, false)?;
        Ok(Some(format!(
            "Thank you, {}! Your message has been received. We will contact you soon.",
            name
        )))
    }

    fn set_busy(&self, surface: &mut dyn Surface, busy: bool) -> Result<()> {
        let Some(button) = self.button else {
            return Ok(());
        };
        if busy {
            surface.set_text(button, &self.sending_label)?;
            surface.set_attribute(button, "disabled", Some(""))
        } else {
            surface.set_text(button, &self.idle_label)?;
            surface.set_attribute(button, "disabled", None)
        }
    }

    pub fn teardown<T: Clone>(&mut self, queue: &mut TimerQueue<T>) {
        if let Some((id, _)) = self.pending.take() {
            queue.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{landing_page, MemorySurface};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn fill_all(form: &ContactForm, surface: &mut MemorySurface, email: &str) {
        form.fill(surface, FormField::Name, "Ada").unwrap();
        form.fill(surface, FormField::Email, email).unwrap();
        form.fill(surface, FormField::Message, "Quote for a warehouse").unwrap();
    }

    #[test]
    fn test_empty_field_rejected_and_inputs_kept() {
        let mut surface = landing_page(1280.0, 800.0);
        let mut form = ContactForm::new(&surface, &FormConfig::default()).unwrap();
        let mut queue = TimerQueue::<()>::new();
        fill_all(&form, &mut surface, "   ");

        let outcome = form.submit(&mut surface, &mut queue, ()).unwrap();
        assert_eq!(outcome, SubmitOutcome::Invalid(REQUIRED_FIELDS_MESSAGE.to_string()));
        assert_eq!(form.value(&surface, FormField::Name).unwrap(), "Ada");
        assert_eq!(form.value(&surface, FormField::Message).unwrap(), "Quote for a warehouse");

        let button = surface.query_one(selectors::SUBMIT_BUTTON).unwrap().unwrap();
        assert_eq!(surface.text(button).unwrap(), "Send Message");
        assert_eq!(surface.attribute(button, "disabled"), None);
        assert_eq!(queue.active_count(), 0);
    }

    #[test]
    fn test_valid_submit_completes_after_delay() {
        let mut surface = landing_page(1280.0, 800.0);
        let mut form = ContactForm::new(&surface, &FormConfig::default()).unwrap();
        let mut queue = TimerQueue::<()>::new();
        let button = surface.query_one(selectors::SUBMIT_BUTTON).unwrap().unwrap();
        fill_all(&form, &mut surface, "ada@example.com");

        assert_eq!(form.submit(&mut surface, &mut queue, ()).unwrap(), SubmitOutcome::Pending);
        assert_eq!(surface.text(button).unwrap(), "Sending...");
        assert_eq!(surface.attribute(button, "disabled").as_deref(), Some(""));
        assert_eq!(form.submit(&mut surface, &mut queue, ()).unwrap(), SubmitOutcome::Busy);

        assert!(queue.pop_due(ms(1999)).is_none());
        assert!(queue.pop_due(ms(2000)).is_some());
        let message = form.complete(&mut surface).unwrap().unwrap();
        assert!(message.starts_with("Thank you, Ada!"));
        assert_eq!(form.value(&surface, FormField::Email).unwrap(), "");
        assert_eq!(surface.text(button).unwrap(), "Send Message");
        assert_eq!(surface.attribute(button, "disabled"), None);
        assert_eq!(form.complete(&mut surface).unwrap(), None);
    }

    #[test]
    fn test_detached_field_leaves_button_idle() {
        let mut surface = landing_page(1280.0, 800.0);
        let mut form = ContactForm::new(&surface, &FormConfig::default()).unwrap();
        let mut queue = TimerQueue::<()>::new();
        fill_all(&form, &mut surface, "ada@example.com");
        let message = surface.query_one(selectors::FIELD_MESSAGE).unwrap().unwrap();
        surface.remove(message).unwrap();

        assert!(form.submit(&mut surface, &mut queue, ()).is_err());
        let button = surface.query_one(selectors::SUBMIT_BUTTON).unwrap().unwrap();
        assert_eq!(surface.text(button).unwrap(), "Send Message");
        assert_eq!(surface.attribute(button, "disabled"), None);
        assert!(!form.is_pending());
        assert_eq!(queue.active_count(), 0);
    }

    #[test]
    fn test_missing_form_is_noop() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let mut form = ContactForm::new(&surface, &FormConfig::default()).unwrap();
        let mut queue = TimerQueue::<()>::new();
        assert!(!form.exists());
        assert_eq!(form.submit(&mut surface, &mut queue, ()).unwrap(), SubmitOutcome::NoForm);
    }
}
