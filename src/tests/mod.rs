mod helper;
mod trips;
mod uploads;
