//! TUI application state: the profile form, the in-flight request, and the
//! week calendar.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use foulee_core::{
    Field, NormalizedProfile, PlanForm, PlanService, RequestToken, Sex, SubmitOutcome,
};

/// Which pane receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form(Field),
    Calendar,
}

/// A validated submission waiting to be run by the event loop.
#[derive(Debug)]
pub struct PendingRequest {
    pub token: RequestToken,
    pub profile: NormalizedProfile,
}

pub struct App {
    pub form: PlanForm,
    pub focus: Focus,
    pub service: PlanService,
    /// Token of the most recent submission still waiting out its delay.
    pub in_flight: Option<RequestToken>,
    pub tick: u64,
    pub tick_rate: Duration,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(service: PlanService) -> Self {
        Self {
            form: PlanForm::default(),
            focus: Focus::Form(Field::Sex),
            service,
            in_flight: None,
            tick: 0,
            tick_rate: Duration::from_millis(100),
            should_quit: false,
            status_message: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Route one key press. Returns a request when the form was submitted
    /// with valid input.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PendingRequest> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => {
                self.focus_next();
                None
            }
            KeyCode::BackTab => {
                self.focus_previous();
                None
            }
            _ => match self.focus {
                Focus::Form(field) => self.handle_form_key(field, key.code),
                Focus::Calendar => {
                    self.handle_calendar_key(key.code);
                    None
                }
            },
        }
    }

    fn handle_form_key(&mut self, field: Field, code: KeyCode) -> Option<PendingRequest> {
        match code {
            KeyCode::Enter => self.submit(),
            KeyCode::Up => {
                self.focus = Focus::Form(step_field(field, -1));
                None
            }
            KeyCode::Down => {
                self.focus = Focus::Form(step_field(field, 1));
                None
            }
            KeyCode::Backspace => {
                let mut value = self.form.input.value(field).to_owned();
                if field == Field::Sex {
                    value.clear();
                } else {
                    value.pop();
                }
                self.form.input.set(field, value);
                None
            }
            KeyCode::Left if field == Field::Sex => {
                self.cycle_sex(-1);
                None
            }
            KeyCode::Right | KeyCode::Char(_) if field == Field::Sex => {
                self.cycle_sex(1);
                None
            }
            KeyCode::Char(c) => {
                let mut value = self.form.input.value(field).to_owned();
                value.push(c);
                self.form.input.set(field, value);
                None
            }
            _ => None,
        }
    }

    fn handle_calendar_key(&mut self, code: KeyCode) {
        if code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }
        let Some(selection) = self.form.selection_mut() else {
            return;
        };
        match code {
            KeyCode::Left | KeyCode::Char('h') => selection.previous(),
            KeyCode::Right | KeyCode::Char('l') => selection.next(),
            KeyCode::Char(' ') | KeyCode::Enter => selection.toggle(),
            _ => {}
        }
    }

    fn cycle_sex(&mut self, step: isize) {
        let current = self.form.input.value(Field::Sex).parse::<Sex>().ok();
        let len = Sex::ALL.len() as isize;
        let next = match current.and_then(|s| Sex::ALL.iter().position(|x| *x == s)) {
            Some(i) => (i as isize + step).rem_euclid(len) as usize,
            None if step < 0 => Sex::ALL.len() - 1,
            None => 0,
        };
        self.form.input.set(Field::Sex, Sex::ALL[next].to_string());
    }

    /// Focus order: the five fields, then the calendar when a plan is shown.
    fn focus_order(&self) -> Vec<Focus> {
        let mut order: Vec<Focus> = Field::ALL.iter().copied().map(Focus::Form).collect();
        if self.form.plan().is_some() {
            order.push(Focus::Calendar);
        }
        order
    }

    fn focus_next(&mut self) {
        let order = self.focus_order();
        let i = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(i + 1) % order.len()];
    }

    fn focus_previous(&mut self) {
        let order = self.focus_order();
        let i = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(i + order.len() - 1) % order.len()];
    }

    /// Validate the form. Invalid input clears the plan, the selection, and
    /// any in-flight request; valid input issues a new request token.
    pub fn submit(&mut self) -> Option<PendingRequest> {
        match self.form.submit() {
            Ok(profile) => {
                let token = self.service.slot().issue();
                self.in_flight = Some(token);
                self.status_message = None;
                Some(PendingRequest { token, profile })
            }
            Err(errors) => {
                self.service.slot().clear();
                self.in_flight = None;
                if matches!(self.focus, Focus::Calendar) {
                    self.focus = Focus::Form(Field::Sex);
                }
                self.status_message = Some(format!("{} champ(s) invalide(s)", errors.len()));
                None
            }
        }
    }

    /// Apply the outcome of a finished request.
    pub fn apply(&mut self, token: RequestToken, outcome: SubmitOutcome) {
        if self.in_flight == Some(token) {
            self.in_flight = None;
        }
        match outcome {
            SubmitOutcome::Committed(plan) => {
                self.form.accept(plan);
                self.status_message = Some("Plan généré".to_owned());
            }
            SubmitOutcome::Invalid(_) => self.form.clear_plan(),
            SubmitOutcome::Superseded | SubmitOutcome::Cancelled => {}
        }
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}

fn step_field(field: Field, step: isize) -> Field {
    let len = Field::ALL.len() as isize;
    let i = Field::ALL.iter().position(|f| *f == field).unwrap_or(0) as isize;
    Field::ALL[(i + step).rem_euclid(len) as usize]
}
