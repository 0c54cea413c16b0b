mod test_close_stops_polling;
