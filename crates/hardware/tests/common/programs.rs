/// Two immediates and their sum.
pub const SUM: &str = "\
li t0, #20
li t1, #5
add t2, t0, t1
";

/// Load, double, store back four words higher. Expects `t0` = 100, `mem[100]` = 10.
pub const LOAD_ADD_STORE: &str = "\
lw t1, 0(t0)
add t2, t1, t1
sw t2, 4(t0)
";

/// Floor division of a negative dividend.
pub const FLOOR_DIV: &str = "\
li t0, #-7
li t1, #2
div t2, t0, t1
";

/// Maximum of `t0` words starting at address `t1`, left in `t2`.
pub const MAX_LOOP: &str = "\
; running maximum over an array
        li   t2, #0
loop:
        lw   t3, 0(t1)
        ble  t3, t2, skip     // not a new maximum
        addi t2, t3, #0
skip:
        addi t1, t1, #4
        subi t0, t0, #1
        bne  t0, zero, loop
";
