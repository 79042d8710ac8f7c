mod barrier_steps;
mod chat_steps;
mod election_steps;
mod membership_steps;
