//! Hardware data types: temperature readings keyed by sensor name.

/// Sensor name -> whole degrees, in the order the BMC reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemperatureReading {
    sensors: Vec<(String, i32)>,
}

impl TemperatureReading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reading, replacing the value of an existing sensor in place.
    pub fn insert(&mut self, name: impl Into<String>, degrees: i32) {
        let name = name.into();
        match self.sensors.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = degrees,
            None => self.sensors.push((name, degrees)),
        }
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.sensors.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.sensors.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Hottest sensor whose name starts with "cpu" (case-insensitive).
    pub fn max_cpu(&self) -> Option<i32> {
        self.iter()
            .filter(|(name, _)| name.to_lowercase().starts_with("cpu"))
            .map(|(_, v)| v)
            .max()
    }

    /// Comma separated sensor names, for diagnostics.
    pub fn names(&self) -> String {
        if self.is_empty() {
            return "none".to_string();
        }
        self.iter().map(|(n, _)| n).collect::<Vec<_>>().join(", ")
    }
}

impl<S: Into<String>> FromIterator<(S, i32)> for TemperatureReading {
    fn from_iter<T: IntoIterator<Item = (S, i32)>>(iter: T) -> Self {
        let mut reading = TemperatureReading::new();
        for (name, degrees) in iter {
            reading.insert(name, degrees);
        }
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_replaces() {
        let mut reading = TemperatureReading::new();
        reading.insert("inlet", 22);
        reading.insert("cpu1", 45);
        reading.insert("inlet", 23);

        let collected: Vec<_> = reading.iter().collect();
        assert_eq!(collected, vec![("inlet", 23), ("cpu1", 45)]);
        assert_eq!(reading.len(), 2);
    }

    #[test]
    fn test_max_cpu_ignores_other_sensors() {
        let reading: TemperatureReading =
            [("inlet", 30), ("CPU1", 48), ("cpu2", 52), ("exhaust", 60)].into_iter().collect();
        assert_eq!(reading.max_cpu(), Some(52));
    }

    #[test]
    fn test_max_cpu_none_without_cpu_sensor() {
        let reading: TemperatureReading = [("inlet", 30), ("exhaust", 40)].into_iter().collect();
        assert_eq!(reading.max_cpu(), None);
        assert_eq!(reading.names(), "inlet, exhaust");
        assert_eq!(TemperatureReading::new().names(), "none");
    }
}
