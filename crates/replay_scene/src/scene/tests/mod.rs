//! Multi-frame scenarios run through a headless session

mod frame_scenarios;
