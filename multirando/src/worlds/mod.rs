pub mod hat_in_time;
