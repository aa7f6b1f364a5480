pub mod flag_card;
