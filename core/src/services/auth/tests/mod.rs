mod attempt_guard_tests;
