use crate::json::JSON;
use crate::scheduling::{
    Algorithm, Anniversary, Cal, PreferredCalendar, ScheduleConfiguration, ScheduleSettings,
};

impl JSON for Cal {}
impl JSON for PreferredCalendar {}
impl JSON for Algorithm {}
impl JSON for ScheduleSettings {}
impl JSON for ScheduleConfiguration {}
impl JSON for Anniversary {}
