use crate::errors::TrackerError;
use crate::models::{Todo, time_based_id};
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Default)]
pub struct TodoList {
    items: Vec<Todo>,
}

impl TodoList {
    pub fn new(items: Vec<Todo>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn add(&mut self, text: &str, now: NaiveDateTime) -> Result<&Todo, TrackerError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TrackerError::EmptyTodo);
        }
        let id = time_based_id(now, |id| self.items.iter().any(|t| t.id == id));
        self.items.push(Todo {
            id,
            text: text.to_string(),
            completed: false,
            created_at: now,
        });
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn toggle(&mut self, todo_id: &str) -> Result<&Todo, TrackerError> {
        let todo = self
            .items
            .iter_mut()
            .find(|t| t.id == todo_id)
            .ok_or_else(|| TrackerError::UnknownTodo(todo_id.to_string()))?;
        todo.completed = !todo.completed;
        Ok(todo)
    }

    pub fn remove(&mut self, todo_id: &str) -> Result<Todo, TrackerError> {
        let index = self
            .items
            .iter()
            .position(|t| t.id == todo_id)
            .ok_or_else(|| TrackerError::UnknownTodo(todo_id.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Completed items created on `today`.
    pub fn completed_on(&self, today: NaiveDate) -> u32 {
        self.items
            .iter()
            .filter(|t| t.completed && t.created_at.date() == today)
            .count() as u32
    }
}
