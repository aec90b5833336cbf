/*! Test coverage for the IR builders and the dependency engine.
 *
 * Each module builds small programs the way a front end would lower real Solidity and checks the
 * answers detectors rely on: may-dependency, taint, access control and aliasing.
 */
