use super::*;
use crate::*;
use std::collections::HashMap;

/// Every player session, keyed by recipient.
#[derive(Debug, Default)]
pub struct Sessions(HashMap<ChatId, Session>);

impl Sessions {
    /// Returns the session for `chat`, creating it on first contact.
    pub fn entry(&mut self, chat: ChatId) -> &mut Session {
        self.0.entry(chat).or_insert_with(|| {
            log::info!("[sessions] new player {}", chat);
            Session::new(INITIAL_BALANCE)
        })
    }
    pub fn get(&self, chat: ChatId) -> Option<&Session> {
        self.0.get(&chat)
    }
    pub fn get_mut(&mut self, chat: ChatId) -> Option<&mut Session> {
        self.0.get_mut(&chat)
    }
    pub fn iter(&self) -> impl Iterator<Item = (ChatId, &Session)> {
        self.0.iter().map(|(chat, session)| (*chat, session))
    }
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ChatId, &mut Session)> {
        self.0.iter_mut().map(|(chat, session)| (*chat, session))
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Recipients that receive broadcasts.
    pub fn subscribers(&self) -> Vec<ChatId> {
        self.iter()
            .filter(|(_, session)| session.notifications())
            .map(|(chat, _)| chat)
            .collect()
    }
    /// Sum of every bet riding on the current round.
    pub fn staked(&self) -> Chips {
        self.iter()
            .filter(|(_, session)| session.is_active())
            .map(|(_, session)| session.bet())
            .sum()
    }
}
