mod automaton;
mod meteor;
mod presentation;
mod rules;
mod seeding;
mod tectonic;
