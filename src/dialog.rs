use std::io::{self, BufRead, Write};

use chrono::NaiveDateTime;

use crate::model::{Workout, DATE_FORMAT};

/// What the form dialog is opened for: a blank record, or a copy of the
/// selected one.
#[derive(Debug, Clone, PartialEq)]
pub enum FormIntent {
    Add,
    Edit(Workout),
}

/// Modal form surface. Returns the confirmed record, or `None` when the
/// dialog was cancelled.
pub trait FormDialog {
    fn open(&mut self, intent: FormIntent) -> Option<Workout>;
}

/// Modal confirmation surface for destructive actions.
pub trait ConfirmDialog {
    fn confirm(&mut self, title: &str, content: &str) -> bool;
}

/// Where per-operation failures surface to the user.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Form backed by a `|`-separated field list from the command line:
/// `sport|description|start|end|location`. For edits, an empty field keeps
/// the current value.
pub struct FieldForm {
    fields: Vec<String>,
}

impl FieldForm {
    pub fn new(raw: &str) -> Self {
        FieldForm {
            fields: raw.split('|').map(str::to_string).collect(),
        }
    }
}

impl FormDialog for FieldForm {
    fn open(&mut self, intent: FormIntent) -> Option<Workout> {
        match intent {
            FormIntent::Add => {
                if self.fields.len() != 5 {
                    return None;
                }

                let date = NaiveDateTime::parse_from_str(&self.fields[2], DATE_FORMAT).ok()?;
                let end_date = NaiveDateTime::parse_from_str(&self.fields[3], DATE_FORMAT).ok()?;

                Some(Workout {
                    id: None,
                    sport: self.fields[0].clone(),
                    description: self.fields[1].clone(),
                    date,
                    end_date,
                    location_name: self.fields[4].clone(),
                })
            }
            FormIntent::Edit(mut workout) => {
                for (index, field) in self.fields.iter().enumerate() {
                    if field.is_empty() {
                        continue;
                    }
                    match index {
                        0 => workout.sport = field.clone(),
                        1 => workout.description = field.clone(),
                        2 => workout.date = NaiveDateTime::parse_from_str(field, DATE_FORMAT).ok()?,
                        3 => {
                            workout.end_date =
                                NaiveDateTime::parse_from_str(field, DATE_FORMAT).ok()?
                        }
                        4 => workout.location_name = field.clone(),
                        _ => return None,
                    }
                }
                Some(workout)
            }
        }
    }
}

/// y/N prompt on stdin.
pub struct StdinConfirm;

impl ConfirmDialog for StdinConfirm {
    fn confirm(&mut self, title: &str, content: &str) -> bool {
        println!("{}", title);
        println!("{}", content);
        print!("[y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }

        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Fixed answer, used by `--yes`.
pub struct AutoConfirm(pub bool);

impl ConfirmDialog for AutoConfirm {
    fn confirm(&mut self, _title: &str, _content: &str) -> bool {
        self.0
    }
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}
