//! Simulated job table for `&`, `jobs`, `bg`, `fg`, `kill` and `ps`.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Stopped,
    Completed,
    Terminated,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Running => "Running",
            JobStatus::Stopped => "Stopped",
            JobStatus::Completed => "Done",
            JobStatus::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: u32,
    pub command: String,
    pub status: JobStatus,
    pub pid: u32,
    pub start_time: DateTime<Utc>,
    pub background: bool,
}

#[derive(Debug, Clone)]
pub struct JobManager {
    jobs: IndexMap<u32, Job>,
    next_id: u32,
    next_pid: u32,
}

impl JobManager {
    pub fn new() -> Self {
        Self {
            jobs: IndexMap::new(),
            next_id: 1,
            next_pid: 1000,
        }
    }

    /// Register a new running job and return it.
    pub fn create_job(&mut self, command: &str, background: bool) -> Job {
        let job = Job {
            id: self.next_id,
            command: command.to_string(),
            status: JobStatus::Running,
            pid: self.next_pid,
            start_time: Utc::now(),
            background,
        };
        self.next_id += 1;
        self.next_pid += 1;
        self.jobs.insert(job.id, job.clone());
        job
    }

    pub fn get_job(&self, id: u32) -> Option<&Job> {
        self.jobs.get(&id)
    }

    pub fn get_job_by_pid(&self, pid: u32) -> Option<&Job> {
        self.jobs.values().find(|job| job.pid == pid)
    }

    pub fn all_jobs(&self) -> Vec<&Job> {
        self.jobs.values().collect()
    }

    pub fn update_status(&mut self, id: u32, status: JobStatus) -> bool {
        match self.jobs.get_mut(&id) {
            Some(job) => {
                job.status = status;
                true
            }
            None => false,
        }
    }

    pub fn set_background(&mut self, id: u32, background: bool) -> bool {
        match self.jobs.get_mut(&id) {
            Some(job) => {
                job.background = background;
                true
            }
            None => false,
        }
    }

    pub fn remove_job(&mut self, id: u32) -> Option<Job> {
        self.jobs.shift_remove(&id)
    }

    /// Terminate a running job. Jobs in any other state are left alone.
    pub fn kill_job(&mut self, id: u32) -> bool {
        match self.jobs.get_mut(&id) {
            Some(job) if job.status == JobStatus::Running => {
                job.status = JobStatus::Terminated;
                true
            }
            _ => false,
        }
    }

    pub fn kill_job_by_pid(&mut self, pid: u32) -> bool {
        match self.get_job_by_pid(pid).map(|job| job.id) {
            Some(id) => self.kill_job(id),
            None => false,
        }
    }

    pub fn running_jobs(&self) -> Vec<&Job> {
        self.jobs
            .values()
            .filter(|job| job.status == JobStatus::Running)
            .collect()
    }

    pub fn background_jobs(&self) -> Vec<&Job> {
        self.jobs
            .values()
            .filter(|job| job.background && job.status == JobStatus::Running)
            .collect()
    }

    /// Most recently created job that has not finished.
    pub fn current_job(&self) -> Option<&Job> {
        self.jobs
            .values()
            .rev()
            .find(|job| matches!(job.status, JobStatus::Running | JobStatus::Stopped))
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_and_pids() {
        let mut jobs = JobManager::new();
        let a = jobs.create_job("sleep 10", true);
        let b = jobs.create_job("sleep 20", false);
        assert_eq!((a.id, a.pid), (1, 1000));
        assert_eq!((b.id, b.pid), (2, 1001));
        assert_eq!(jobs.get_job_by_pid(1001).map(|j| j.id), Some(2));
        assert_eq!(jobs.background_jobs().len(), 1);
    }

    #[test]
    fn test_kill_only_running() {
        let mut jobs = JobManager::new();
        let job = jobs.create_job("top", true);
        assert!(jobs.update_status(job.id, JobStatus::Stopped));
        assert!(!jobs.kill_job(job.id));
        jobs.update_status(job.id, JobStatus::Running);
        assert!(jobs.kill_job_by_pid(job.pid));
        assert_eq!(jobs.get_job(job.id).unwrap().status, JobStatus::Terminated);
        assert!(jobs.running_jobs().is_empty());
        assert!(!jobs.update_status(99, JobStatus::Running));
    }

    #[test]
    fn test_current_job() {
        let mut jobs = JobManager::new();
        assert!(jobs.current_job().is_none());
        jobs.create_job("a", true);
        let b = jobs.create_job("b", true);
        assert_eq!(jobs.current_job().map(|j| j.id), Some(b.id));
        jobs.update_status(b.id, JobStatus::Completed);
        assert_eq!(jobs.current_job().map(|j| j.id), Some(1));
        assert!(jobs.remove_job(1).is_some());
        assert!(jobs.current_job().is_none());
    }
}
