use crate::{MAX_NREGS, MAX_WRITE_NREGS};

pub fn nregs_len(nobjs: u16) -> usize {
    nobjs as usize * 2
}

pub fn nregs_check(nobjs: u16) -> bool {
    nobjs > 0 && nobjs as usize <= MAX_NREGS
}

pub fn nregs_write_check(nobjs: usize) -> bool {
    nobjs > 0 && nobjs <= MAX_WRITE_NREGS
}
